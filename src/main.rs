//! Jack of Blades entry point
//!
//! Headless harness: loads a level, starts it and steps it at the fixed
//! timestep, recording draw commands instead of rendering them.
//!
//! Usage: `jack-of-blades [level.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
mod harness {
    use std::cell::RefCell;
    use std::env;
    use std::path::PathBuf;
    use std::rc::Rc;

    use jack_of_blades::Result;
    use jack_of_blades::Settings;
    use jack_of_blades::assets::AnimationLibrary;
    use jack_of_blades::consts::SIM_DT;
    use jack_of_blades::input::{KeyState, actions};
    use jack_of_blades::render::DrawList;
    use jack_of_blades::sim::{Level, LevelObject, LoadContext, ObjectRegistry, Player};

    const DEFAULT_LEVEL: &str = "data/level/example.json";
    const ANIMATION_DIR: &str = "data/animation";
    const SETTINGS_FILE: &str = "settings.json";
    const DEFAULT_FRAMES: u32 = 600;

    pub fn run() -> Result<()> {
        let mut args = env::args().skip(1);
        let level_path = args
            .next()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEVEL));
        let frames = match args.next() {
            Some(arg) => arg.parse().unwrap_or_else(|_| {
                log::warn!("Invalid frame count {arg}, using {DEFAULT_FRAMES}");
                DEFAULT_FRAMES
            }),
            None => DEFAULT_FRAMES,
        };

        let settings = Settings::load(SETTINGS_FILE);
        let animations = AnimationLibrary::load_dir(ANIMATION_DIR).unwrap_or_else(|e| {
            log::warn!("No animations loaded: {e}");
            AnimationLibrary::new()
        });
        let registry = ObjectRegistry::builtin()?;
        let ctx = LoadContext::new(&animations, &settings);

        let keys = Rc::new(RefCell::new(KeyState::new()));
        let mut level = Level::load(&level_path, &registry, &ctx)?;
        level.set_input(keys.clone());
        level.start();

        // Walk right for the first half of the run, then stand still
        let mut canvas = DrawList::new();
        let mut commands = 0usize;
        keys.borrow_mut().press(actions::MOVE_RIGHT);
        for frame in 0..frames {
            if frame == frames / 2 {
                keys.borrow_mut().release(actions::MOVE_RIGHT);
            }
            level.update(SIM_DT);
            keys.borrow_mut().end_frame();

            canvas.clear();
            level.draw(&mut canvas);
            level.draw_lighting(&mut canvas);
            if level.debug_collision() {
                level.debug_draw_collision(&mut canvas);
            }
            commands += canvas.len();
        }

        log::info!(
            "Ran {} for {frames} frames: {} objects, scroll {:?}, {commands} draw commands",
            level.name(),
            level.len(),
            level.scroll()
        );
        let player = level.objects().iter().find_map(|e| {
            e.downcast::<Player>()
                .map(|p| (p.body().rect(), p.health().current(), p.state()))
        });
        match player {
            Some((rect, health, state)) => {
                log::info!("Player at {rect:?}, health {health}, state {state:?}")
            }
            None => log::info!("Level has no player"),
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Jack of Blades (headless) starting...");

    if let Err(e) = harness::run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no wasm harness
}
