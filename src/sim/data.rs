//! Typed field access for level-file JSON
//!
//! Optional keys may be absent, but a key that is present must have the
//! right shape: wrong types and wrong array lengths are load errors, never
//! silently defaulted.

use glam::DVec2;
use serde_json::{Value, json};

use super::body::Body;
use super::collision::CollisionType;
use crate::error::{LevelError, Result};
use crate::geom::Rect;
use crate::render::Color;

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_u64() => "unsigned integer",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(key: &str, expected: &'static str, found: &Value) -> LevelError {
    LevelError::WrongType {
        key: key.to_string(),
        expected,
        found: type_name(found),
    }
}

pub fn require<'a>(data: &'a Value, key: &str, expected: &'static str) -> Result<&'a Value> {
    data.get(key).ok_or_else(|| LevelError::MissingKey {
        key: key.to_string(),
        expected,
    })
}

pub fn opt_str<'a>(data: &'a Value, key: &str) -> Result<Option<&'a str>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(wrong_type(key, "string", other)),
    }
}

pub fn req_str<'a>(data: &'a Value, key: &str) -> Result<&'a str> {
    opt_str(data, key)?.ok_or_else(|| LevelError::MissingKey {
        key: key.to_string(),
        expected: "string",
    })
}

pub fn req_array<'a>(data: &'a Value, key: &str) -> Result<&'a Vec<Value>> {
    match require(data, key, "array")? {
        Value::Array(items) => Ok(items),
        other => Err(wrong_type(key, "array", other)),
    }
}

fn fixed_array<'a, const N: usize>(key: &str, value: &'a Value) -> Result<&'a [Value]> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(wrong_type(key, "array", other)),
    };
    if items.len() != N {
        return Err(LevelError::WrongArity {
            key: key.to_string(),
            expected: N,
            found: items.len(),
        });
    }
    Ok(items)
}

fn numbers<const N: usize>(key: &str, value: &Value) -> Result<[f64; N]> {
    let items = fixed_array::<N>(key, value)?;
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item
            .as_f64()
            .ok_or_else(|| wrong_type(key, "array of numbers", item))?;
    }
    Ok(out)
}

/// `[x, y, w, h]`
pub fn opt_rect(data: &Value, key: &str) -> Result<Option<Rect>> {
    data.get(key)
        .map(|v| numbers::<4>(key, v).map(Rect::from_components))
        .transpose()
}

pub fn req_rect(data: &Value, key: &str) -> Result<Rect> {
    numbers::<4>(key, require(data, key, "array of 4 numbers")?).map(Rect::from_components)
}

/// `[x, y]`
pub fn opt_vec2(data: &Value, key: &str) -> Result<Option<DVec2>> {
    data.get(key)
        .map(|v| numbers::<2>(key, v).map(|[x, y]| DVec2::new(x, y)))
        .transpose()
}

pub fn opt_bool(data: &Value, key: &str) -> Result<Option<bool>> {
    match data.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong_type(key, "bool", other)),
    }
}

pub fn opt_f32(data: &Value, key: &str) -> Result<Option<f32>> {
    match data.get(key) {
        None => Ok(None),
        Some(v) => v
            .as_f64()
            .map(|n| Some(n as f32))
            .ok_or_else(|| wrong_type(key, "number", v)),
    }
}

fn opt_unsigned(data: &Value, key: &str, max: u64) -> Result<Option<u64>> {
    let Some(value) = data.get(key) else {
        return Ok(None);
    };
    let n = value
        .as_u64()
        .ok_or_else(|| wrong_type(key, "unsigned integer", value))?;
    if n > max {
        return Err(LevelError::OutOfRange {
            key: key.to_string(),
            detail: format!("{n} exceeds {max}"),
        });
    }
    Ok(Some(n))
}

pub fn opt_u8(data: &Value, key: &str) -> Result<Option<u8>> {
    Ok(opt_unsigned(data, key, u8::MAX as u64)?.map(|n| n as u8))
}

pub fn opt_collision_type(data: &Value, key: &str) -> Result<Option<CollisionType>> {
    let max = CollisionType::BlockAll as u64;
    Ok(opt_unsigned(data, key, max)?.and_then(|n| CollisionType::from_u32(n as u32)))
}

/// `[r, g, b]` either as 0-255 integers or as 0-1 floats
///
/// All-integer arrays are read as bytes; anything else is read as unit
/// floats and clamped.
pub fn opt_color(data: &Value, key: &str) -> Result<Option<Color>> {
    let Some(value) = data.get(key) else {
        return Ok(None);
    };
    let items = fixed_array::<3>(key, value)?;

    if items.iter().all(Value::is_u64) {
        let mut rgb = [0u8; 3];
        for (slot, item) in rgb.iter_mut().zip(items) {
            let n = item.as_u64().unwrap_or_default();
            *slot = u8::try_from(n).map_err(|_| LevelError::OutOfRange {
                key: key.to_string(),
                detail: format!("color channel {n} exceeds 255"),
            })?;
        }
        return Ok(Some(Color::rgb(rgb[0], rgb[1], rgb[2])));
    }

    let [r, g, b] = numbers::<3>(key, value)?;
    Ok(Some(Color::from_unit(r, g, b)))
}

/// Collision fields shared by most serializers
pub(crate) fn body_to_data(body: &Body, rect_key: &str) -> Value {
    let mut data = json!({
        "collision_type": u32::from(body.collision_type()),
        "walkable": body.walkable(),
    });
    data[rect_key] = json!(body.rect().components());
    data
}

pub(crate) fn color_to_data(color: Color) -> Value {
    json!(color.rgb_array())
}
