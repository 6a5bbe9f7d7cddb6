//! Host integration demo: register plugin modules, then activate plugins
//! incrementally through a scoped loader.
//!
//! Run with:
//!   cargo run --example host_demo

use plughost::{Args, Module, PluginHost, PluginType, TypeKey};

trait Notifier {
    fn notify(&self, message: &str) -> String;
}

struct Console;

struct Webhook {
    endpoint: String,
}

impl Notifier for Console {
    fn notify(&self, message: &str) -> String {
        format!("[console] {message}")
    }
}

impl Notifier for Webhook {
    fn notify(&self, message: &str) -> String {
        format!("[webhook -> {}] {message}", self.endpoint)
    }
}

fn console_module() -> Module {
    Module::new("console-notifier").with_type(
        PluginType::<Console>::new()
            .implements::<dyn Notifier>(|value| value as Box<dyn Notifier>)
            .nullary(|| Console),
    )
}

fn webhook_module() -> Module {
    Module::new("webhook-notifier").with_type(
        PluginType::<Webhook>::new()
            .implements::<dyn Notifier>(|value| value as Box<dyn Notifier>)
            .constructor(vec![TypeKey::of::<String>()], |args| {
                Ok(Webhook {
                    endpoint: args.get::<String>(0)?.clone(),
                })
            }),
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let host = PluginHost::new();
    let mut notifiers = host.scoped::<dyn Notifier>();

    // Shared-library plugins would be picked up the same way:
    //   host.load_directory("./plugins");
    host.load_module(console_module());
    for notifier in notifiers.new_instances(&Args::new()) {
        println!("{}", notifier.notify("plugin system online"));
    }

    // A module appearing later is picked up by the next poll, alone.
    host.load_module(webhook_module());
    let args = Args::new().with("https://example.test/hook".to_string());
    for notifier in notifiers.new_instances(&args) {
        println!("{}", notifier.notify("second wave"));
    }

    // Nothing new, nothing activated.
    assert!(notifiers.new_instances(&Args::new()).is_empty());
    println!("no new plugins on the final poll");
}
