pub mod json_api;

pub use json_api::{
    simulate_slate_json, GamePair, PropProbability, SlateRequest, SlateResponse, SCHEMA_VERSION,
};
