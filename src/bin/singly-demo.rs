//! replays a scripted sequence of operations against a LinkedList and prints
//! the rendering of the list after each phase

use log::LevelFilter;
use singly_rs::LinkedList;

/// environment variable selecting the demo's log level
const LOG_LEVEL_VAR: &str = "SINGLY_LOG";

fn level_from_env() -> LevelFilter {
    let level = std::env::var(LOG_LEVEL_VAR).unwrap_or_default();
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}

fn main() -> Result<(), log::SetLoggerError> {
    init_logger(level_from_env())?;

    let mut list = LinkedList::new();
    println!("{}", list);

    for value in [1, 2, 3, -4, 5, 6] {
        list.append(value);
    }
    println!("{}", list);

    list.prepend(55);
    println!("{}", list);

    list.prepend(44);
    println!("{}", list);

    println!("{:?}", list.head());
    match list.tail() {
        Ok(tail) => println!("{:?}", tail),
        Err(e) => log::warn!("tail: {}", e),
    }

    for index in [2, 125] {
        match list.at(index) {
            Ok(node) => log::info!("at({}) = {}", index, node.value()),
            Err(e) => log::warn!("at({}): {}", index, e),
        }
    }

    log::info!("find(-4) = {:?}", list.find(&-4));
    log::info!("contains(55) = {}", list.contains(&55));

    if let Err(e) = list.insert_at(7, 3) {
        log::warn!("insert_at(7, 3): {}", e);
    }
    if let Err(e) = list.insert_at(7, 100) {
        log::warn!("insert_at(7, 100): {}", e);
    }
    println!("{}", list);

    // one more pop than there are nodes
    for _ in 0..=list.size() {
        match list.pop() {
            Ok(value) => log::info!("popped {}", value),
            Err(e) => log::warn!("pop: {}", e),
        }
    }
    println!("{}", list);

    Ok(())
}
