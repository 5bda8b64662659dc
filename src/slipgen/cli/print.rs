use colored::*;
use slipgen::api::{CmdMessage, MessageLevel};
use slipgen::config::{SlipConfig, CONFIG_KEYS};

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub fn print_config(config: &SlipConfig) {
    for line in config_lines(config) {
        println!("{}", line);
    }
}

fn config_lines(config: &SlipConfig) -> Vec<String> {
    CONFIG_KEYS
        .iter()
        .map(|key| format!("{} = {}", key, config.get(key).unwrap_or_default()))
        .collect()
}
