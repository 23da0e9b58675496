//! Command-line front end: load a weather data file, train the classifier,
//! and predict rain-tomorrow for one of the loaded records.

use raincast::model::{StepAction, StepObserver, WeightUpdate};
use raincast::weather::read::{cull_missing, read_observations_path};
use raincast::{RainClassifier, TrainingConfig};
use serde::Serialize;
use std::env;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

const DEFAULT_FILENAME: &str = "weather.csv";

const USAGE: &str = "\
Usage: raincast [OPTIONS] [FILENAME]

  FILENAME          data file to load (default: weather.csv)
  -train N          only read the first N records (0 = all)
  -epochs N         number of training epochs (default: 10)
  -predict N        index of the record to predict (default: 0)
  -debug            dump matrices, statistics, and weights while training
  -debug-weights    step through every weight update on the console
  -FIELD            drop records whose FIELD is missing (e.g. -hoursofsunshine)";

#[derive(Debug, PartialEq)]
struct CliOptions {
    filename: String,
    debug: bool,
    step_weights: bool,
    train_limit: usize,
    epochs: usize,
    predict_index: usize,
    cull_fields: Vec<String>,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_FILENAME.to_string(),
            debug: false,
            step_weights: false,
            train_limit: 0,
            epochs: 10,
            predict_index: 0,
            cull_fields: Vec::new(),
        }
    }
}

fn parse_args<I: Iterator<Item = String>>(args: I) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut saw_filename = false;
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-debug" => options.debug = true,
            "-debug-weights" => options.step_weights = true,
            "-train" => options.train_limit = numeric_flag(&arg, args.next())?,
            "-epochs" => options.epochs = numeric_flag(&arg, args.next())?,
            "-predict" => options.predict_index = numeric_flag(&arg, args.next())?,
            // Any other dash argument names a field whose missing records
            // should be dropped. Field names are validated against the
            // dataset later.
            other if other.starts_with('-') => {
                options.cull_fields.push(other[1..].to_string());
            }
            _ => {
                if saw_filename {
                    return Err(format!("unexpected extra argument '{}'", arg));
                }
                options.filename = arg;
                saw_filename = true;
            }
        }
    }
    Ok(options)
}

fn numeric_flag(flag: &str, value: Option<String>) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("{} requires a number", flag))?;
    value
        .parse()
        .map_err(|_| format!("{} requires a number, got '{}'", flag, value))
}

#[derive(Serialize)]
struct WeightEntry<'a> {
    feature: &'a str,
    weight: f64,
}

/// Interactive observer: prints each weight update and waits for a console
/// command before continuing.
struct ConsoleStepper<R> {
    input: R,
}

impl<R: BufRead> StepObserver for ConsoleStepper<R> {
    fn on_weight_update(&mut self, update: &WeightUpdate<'_>) -> StepAction {
        println!(
            "Epoch {} | {} (weight {}): {} -> {} (summation {})",
            update.epoch, update.feature, update.index, update.old, update.new, update.summation
        );
        print!("[Enter] next weight, (e)poch skip, (q)uit stepping: ");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if self.input.read_line(&mut line).is_err() {
            return StepAction::EndTraining;
        }
        match line.trim() {
            "e" => StepAction::NextEpoch,
            "q" => StepAction::EndTraining,
            _ => StepAction::Continue,
        }
    }
}

fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let mut records = read_observations_path(&options.filename, options.train_limit)?;
    println!("Read {} records from {}", records.len(), options.filename);

    for field in &options.cull_fields {
        let removed = cull_missing(&mut records, field)?;
        println!("Removed {} records missing {}", removed, field);
    }

    if options.predict_index >= records.len() {
        return Err(format!(
            "cannot predict record {}: only {} records loaded",
            options.predict_index,
            records.len()
        )
        .into());
    }
    let target = records[options.predict_index].clone();

    let config = TrainingConfig::default()
        .with_epochs(options.epochs)
        .with_verbose(options.debug);
    let mut model = if options.step_weights {
        let stdin = io::stdin();
        let mut stepper = ConsoleStepper {
            input: stdin.lock(),
        };
        RainClassifier::fit_with_observer(&records, config, &mut stepper)?
    } else {
        RainClassifier::fit(&records, config)?
    };

    if options.debug {
        let entries: Vec<WeightEntry> = model
            .feature_stats()
            .iter()
            .map(|s| s.name())
            .zip(model.weights().as_slice().iter().copied())
            .map(|(feature, weight)| WeightEntry { feature, weight })
            .collect();
        println!("Weights: {}", serde_json::to_string_pretty(&entries)?);
    }

    println!(
        "Predicting data point {}: {}",
        options.predict_index, target
    );
    let forecast = model.predict(&target)?;
    let answer = match target.rain_tomorrow {
        Some(true) => "Rain",
        Some(false) => "No rain",
        None => "Unknown",
    };
    println!("Prediction: {}", forecast);
    println!("True answer: {}", answer);
    Ok(())
}

fn main() -> ExitCode {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };
    match run(options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliOptions, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_defaults() {
        let options = parse(&[]).unwrap();
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn test_flags_and_filename() {
        let options =
            parse(&["-debug", "-train", "500", "-epochs", "3", "data.csv"]).unwrap();
        assert!(options.debug);
        assert_eq!(options.train_limit, 500);
        assert_eq!(options.epochs, 3);
        assert_eq!(options.filename, "data.csv");
    }

    #[test]
    fn test_unknown_dash_argument_is_cull_field() {
        let options = parse(&["-hoursofsunshine", "-gustdirection"]).unwrap();
        assert_eq!(
            options.cull_fields,
            vec!["hoursofsunshine".to_string(), "gustdirection".to_string()]
        );
    }

    #[test]
    fn test_missing_flag_value() {
        assert!(parse(&["-train"]).is_err());
        assert!(parse(&["-epochs", "many"]).is_err());
    }

    #[test]
    fn test_extra_positional_rejected() {
        assert!(parse(&["one.csv", "two.csv"]).is_err());
    }

    #[test]
    fn test_console_stepper_actions() {
        let mut stepper = ConsoleStepper {
            input: "\ne\nq\n".as_bytes(),
        };
        let update = WeightUpdate {
            epoch: 0,
            feature: "Sunshine",
            index: 6,
            old: 1.0,
            new: 1.2,
            summation: 2.0,
        };
        assert_eq!(stepper.on_weight_update(&update), StepAction::Continue);
        assert_eq!(stepper.on_weight_update(&update), StepAction::NextEpoch);
        assert_eq!(stepper.on_weight_update(&update), StepAction::EndTraining);
    }
}
