//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Real elapsed time (the simulation only ever sees seconds since start)
//! - Logger setup
//! - JS bindings for the browser front end

#[cfg(not(target_arch = "wasm32"))]
pub use native::WallClock;

#[cfg(target_arch = "wasm32")]
pub use web::BeamsSession;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Instant;

    /// Real time since the clock was created
    #[derive(Debug, Clone, Copy)]
    pub struct WallClock {
        started: Instant,
    }

    impl WallClock {
        pub fn start() -> Self {
            Self {
                started: Instant::now(),
            }
        }

        pub fn elapsed_secs(&self) -> f64 {
            self.started.elapsed().as_secs_f64()
        }
    }

    impl Default for WallClock {
        fn default() -> Self {
            Self::start()
        }
    }

}

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;

    use crate::settings::SimConfig;
    use crate::sim::Simulation;

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        // Fails only when a logger is already installed (module loaded twice)
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            log::debug!("Console logger not installed: {e}");
        }
        log::info!("Knickebein starting...");
    }

    /// Browser handle on a simulation session
    #[wasm_bindgen]
    pub struct BeamsSession {
        sim: Simulation,
        started_ms: f64,
    }

    #[wasm_bindgen]
    impl BeamsSession {
        /// New session; `config_json` may be empty for defaults
        #[wasm_bindgen(constructor)]
        pub fn new(config_json: Option<String>) -> Result<BeamsSession, JsValue> {
            let config = match config_json.as_deref() {
                Some(json) if !json.trim().is_empty() => SimConfig::from_json(json),
                _ => Ok(SimConfig::default()),
            };
            let sim = config
                .and_then(Simulation::new)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            Ok(Self {
                sim,
                started_ms: js_sys::Date::now(),
            })
        }

        /// Catch up to `elapsed_secs` and return the JSON snapshot
        pub fn tick(&mut self, elapsed_secs: f64) -> Result<String, JsValue> {
            self.sim.advance(elapsed_secs);
            for event in self.sim.drain_events() {
                log::debug!("{event:?}");
            }
            serde_json::to_string(&self.sim.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
        }

        /// `tick` using the browser clock since construction
        pub fn tick_now(&mut self) -> Result<String, JsValue> {
            let elapsed_secs = (js_sys::Date::now() - self.started_ms) / 1000.0;
            self.tick(elapsed_secs)
        }

        pub fn set_interference(&mut self, dot_amplitude: f64, dash_amplitude: f64) {
            self.sim.set_interference(dot_amplitude, dash_amplitude);
        }

        pub fn set_interference_enabled(&mut self, enabled: bool) {
            self.sim.set_interference_enabled(enabled);
        }

        pub fn flip_drift(&mut self) {
            self.sim.flip_drift();
        }
    }
}
