#![cfg(feature = "wasm")]

use wasm_bindgen::prelude::*;

use crate::api::SimulatorApi;
use crate::builder::ScenarioBuilder;

/// WASM binding for the simulator API.
///
/// Exposes the pure Rust `SimulatorApi` to JavaScript.
#[wasm_bindgen]
pub struct Simulator {
    api: SimulatorApi,
}

#[wasm_bindgen]
impl Simulator {
    /// Create an interactive simulation from a predefined scenario.
    /// In a real app, this could parse JSON to build a dynamic scenario.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        console_error_panic_hook::set_once();

        let api = ScenarioBuilder::new()
            .process(1, 0, 7)
            .event(1, "load data from memory")
            .event(5, "write to cache")
            .process(2, 1, 4)
            .event(2, "compare values")
            .process(3, 2, 8)
            .process(4, 3, 5)
            .round_robin(4)
            .build()
            .expect("default scenario is valid");

        Simulator { api }
    }

    /// Advance one tick. Returns a JSON string describing the step, or
    /// null when the simulation is finished.
    pub fn step(&mut self) -> Option<String> {
        let result = self.api.step()?;
        Some(format!(
            "{{\"time\":{},\"description\":\"{}\",\"finished\":{}}}",
            result.time,
            result.description.replace('"', "\\\""),
            result.finished,
        ))
    }

    /// Run to the end of the timeline. Returns ticks advanced.
    pub fn run_all(&mut self) -> u32 {
        self.api.run_to_end() as u32
    }

    /// Export the current projection as a JSON string.
    pub fn state_json(&self) -> String {
        self.api.state_json()
    }

    /// Export the annotated timeline as a JSON string.
    pub fn timeline_json(&self) -> String {
        self.api.timeline_json()
    }

    /// Export the algorithm catalog as a JSON string.
    pub fn algorithms_json() -> String {
        SimulatorApi::algorithms_json()
    }

    /// Returns `true` once the clock has reached the end.
    pub fn is_finished(&self) -> bool {
        self.api.is_finished()
    }

    /// Current simulated time.
    pub fn current_time(&self) -> u32 {
        self.api.current_time() as u32
    }
}
