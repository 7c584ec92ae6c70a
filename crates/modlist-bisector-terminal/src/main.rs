use std::path::PathBuf;

use modlist_bisector::{Config, ModList};

const DEFAULT_CONFIG_PATH: &str = "config.toml";

const COMMANDS: &str = "\
Commands:
    start               Load mods from the config root and disable half of them
    reset               Load mods from the config root and enable all of them
    status              Show how many mods remain
    good                The problem is gone, the enabled mods are not the cause
    bad                 The problem persists, the disabled mods are not the cause
    required ID         Always keep ID enabled
    dependency ID DEP   Record that ID requires DEP
    enable ID           Enable a single mod
    disable ID          Disable a single mod
    toggle ID           Toggle a single mod
    history             Show the enabled mods after each step
    rollover            Start a new history log";

fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",       "Show help");
		opts.optflag( "v", "verbose",    "Increased verbosity");
		opts.optopt(  "c", "config",     "Config file to use", "PATH");
		opts.optopt(  "s", "state-dir",  "Directory the graph and history are stored in", "DIR");
		opts.optflag( "",  "no-reset",   "`start` with the mods' current state instead of enabling all of them");
		opts.optflag( "",  "list",       "`status` also lists the remaining mods");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { eprintln!("Unable to parse options: {}", e); std::process::exit(2) }
		};

		if parsed_options.opt_present("h") || parsed_options.free.is_empty() {
			eprintln!("{}\n{}", opts.usage("Usage: modlist-bisector [options] COMMAND"), COMMANDS);
			return;
		}

		parsed_options
	};

	{
		let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
		if parsed_options.opt_present("v") {
			builder.filter_level(log::LevelFilter::Debug);
		}
		builder.init();
	}

	let options = Options {
		config_path: parsed_options.opt_str("c").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
		state_dir: parsed_options.opt_str("s").map(PathBuf::from).unwrap_or_else(|| PathBuf::from(".")),
		reset: !parsed_options.opt_present("no-reset"),
		list: parsed_options.opt_present("list"),
	};

	if let Err(e) = run(&options, &parsed_options.free) {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

struct Options {
	config_path: PathBuf,
	state_dir: PathBuf,
	reset: bool,
	list: bool,
}

impl Options {
	fn config(&self) -> Result<Config, Error> {
		Ok(Config::load_from_disk(&self.config_path)?)
	}

	fn load(&self) -> Result<ModList, Error> {
		match ModList::load(self.config()?, &self.state_dir) {
			Err(modlist_bisector::Error::IO(e)) if e.kind() == std::io::ErrorKind::NotFound => {
				log::error!("No saved session found in {}, run `start` first.", self.state_dir.display());
				Err(Error::ModList(modlist_bisector::Error::IO(e)))
			},
			other => Ok(other?),
		}
	}
}

fn run(options: &Options, free: &[String]) -> Result<(), Error> {
	let command = free[0].as_str();
	let argument = |i: usize| free.get(i).map(String::as_str).ok_or(Error::MissingArgument);

	match command {
		"start" => {
			let mut modlist = ModList::build(options.config()?, &options.state_dir, options.reset)?;
			print_report(modlist.bisect()?);
			modlist.save()?;
		},
		"reset" => {
			let mut modlist = ModList::build(options.config()?, &options.state_dir, true)?;
			println!("Enabled all {} mods.", modlist.count_nodes().total);
			modlist.save()?;
		},
		"status" => {
			let modlist = options.load()?;
			let counts = modlist.count_nodes();
			println!("Enabled:  {}", counts.enabled);
			println!("Disabled: {}", counts.disabled);
			println!("Locked:   {}", counts.locked());
			println!("Total:    {}", counts.total);

			if options.list {
				for entry in modlist.pending_nodes().values() {
					println!("{}", entry.name);
				}
			}
		},
		"good" => {
			let mut modlist = options.load()?;
			modlist.set_enabled_good()?;
			print_report(modlist.bisect()?);
			modlist.save()?;
		},
		"bad" => {
			let mut modlist = options.load()?;
			modlist.set_disabled_good();
			print_report(modlist.bisect()?);
			modlist.save()?;
		},
		"required" => {
			let identifier = argument(1)?;
			let mut modlist = options.load()?;
			modlist.require(identifier)?;
			println!("{} will stay enabled.", identifier);
			modlist.save()?;
		},
		"dependency" => {
			let (identifier, dependency) = (argument(1)?, argument(2)?);
			let mut modlist = options.load()?;
			modlist.add_dependency(identifier, dependency)?;
			println!("{} now depends on {}.", identifier, dependency);
			modlist.save()?;
		},
		"enable" | "disable" | "toggle" => {
			let identifier = argument(1)?;
			let mut modlist = options.load()?;
			let changed = match command {
				"enable" => modlist.enable(identifier)?,
				"disable" => modlist.disable(identifier)?,
				_ => modlist.toggle(identifier)?,
			};
			let state = if modlist.get(identifier).map_or(false, |e| e.enabled) { "enabled" } else { "disabled" };
			if changed {
				println!("{} is now {}.", identifier, state);
			} else {
				println!("{} was already {}.", identifier, state);
			}
			modlist.save()?;
		},
		"history" => {
			let history = modlist_bisector::History::load(&options.state_dir)?;
			for (i, entry) in history.entries().iter().enumerate() {
				println!("{}: {}", i, entry.join(", "));
			}
		},
		"rollover" => {
			let mut history = modlist_bisector::History::load(&options.state_dir)?;
			history.rollover()?;
			history.save()?;
			println!("Started {}.", history.path().display());
		},
		_ => return Err(Error::UnknownCommand(command.to_string())),
	}

	Ok(())
}

fn print_report(report: modlist_bisector::BisectReport) {
	println!("Disabled {} mods ({}/{} remaining).", report.newly_disabled, report.remaining, report.total);
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	ModList(#[from] modlist_bisector::Error),
	#[error("Missing argument")]
	MissingArgument,
	#[error("Unknown command `{0}`")]
	UnknownCommand(String),
}
