/// Route of every message handled by the IBC core modules.
pub const ROUTER_KEY: &str = "ibc";
