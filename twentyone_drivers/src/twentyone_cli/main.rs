mod table;

use clap::Parser;
use twentyone::{GameState, MonteCarlo};
use twentyone_drivers::{parse_config_from_file, Config};

const DEFAULT_CONFIG_PATH: &str = "~/.twentyone.yml";

#[derive(Debug, Parser)]
#[command(author, about, long_about = None)]
struct CommandLineArgs {
    /// The path of the config file
    #[arg(short, long, default_value_t = String::from(DEFAULT_CONFIG_PATH))]
    config: String,
}

fn main() {
    let args = CommandLineArgs::parse();
    let config = if args.config == DEFAULT_CONFIG_PATH {
        let home_dir = home::home_dir().expect("Cannot find home directory");
        let config_file_path = home_dir.join(".twentyone.yml");
        if config_file_path.is_file() {
            parse_config_from_file(config_file_path.to_str().expect("path is not valid UTF-8"))
        } else {
            // The game should start out of the box when no config has been
            // written yet.
            Config::default()
        }
    } else {
        parse_config_from_file(&args.config)
    };

    let simulator = MonteCarlo::new(config.simulator.trial_count);
    let mut game = GameState::with_simulator(config.game.starting_cash, simulator);
    table::play(&mut game);
}
