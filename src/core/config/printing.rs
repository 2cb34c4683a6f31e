use crate::core::config::data::{Config, ResolvedSettings};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: (unset)"),
        }
        match self.fan_out {
            Some(mode) => println!("  fan-out: {}", mode.as_str()),
            None => println!("  fan-out: (unset)"),
        }
        match self.mentor_order {
            Some(order) => println!("  mentor-order: {}", order.as_str()),
            None => println!("  mentor-order: (unset)"),
        }
        match self.request_timeout_secs {
            Some(secs) => println!("  request-timeout: {secs}s"),
            None => println!("  request-timeout: (unset)"),
        }
        match &self.log_file {
            Some(path) => println!("  log-file: {path}"),
            None => println!("  log-file: (unset)"),
        }
    }
}

impl ResolvedSettings {
    pub fn print_all(&self) {
        println!("Effective settings:");
        println!("  endpoint: {}", self.endpoint);
        println!("  fan-out: {}", self.fan_out.as_str());
        println!("  mentor-order: {}", self.mentor_order.as_str());
        match self.request_timeout {
            Some(timeout) => println!("  request-timeout: {}s", timeout.as_secs()),
            None => println!("  request-timeout: transport default"),
        }
        match &self.log_file {
            Some(path) => println!("  log-file: {}", path.display()),
            None => println!("  log-file: (none)"),
        }
    }
}
