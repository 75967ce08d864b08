use figment::{providers::Env, Figment};
use serde::Deserialize;

use rpn::Overflow;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub prompt: String,
    pub history: bool,
    pub overflow: Overflow,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            prompt: "rpnc> ".to_string(),
            history: true,
            overflow: Overflow::default(),
        }
    }
}

pub fn figment() -> Figment {
    Figment::new().merge(Env::prefixed("RPNC_"))
}
