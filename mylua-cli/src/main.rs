use std::process;

use mylua_cli::{logging, run, Config, RunResult};

fn main() {
    let config = Config::new();
    logging::init(config.verbose);

    if run(config) != RunResult::Ok {
        process::exit(1);
    }
}
