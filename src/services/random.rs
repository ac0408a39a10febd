//! Random replies: weighted tables for `/meow` and `/fortune`, rolls for
//! `/chance` and `/pick`.

use anyhow::{anyhow, Context, Result};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::BTreeMap;

use crate::config::CommandsConfig;

/// Reply texts drawn with probability proportional to their weight
#[derive(Debug, Clone)]
pub struct WeightedTable {
    names: Vec<String>,
    index: WeightedIndex<u32>,
}

impl WeightedTable {
    pub fn new(choices: &BTreeMap<String, u32>) -> Result<Self> {
        if choices.is_empty() {
            return Err(anyhow!("choice table cannot be empty"));
        }

        let names: Vec<String> = choices.keys().cloned().collect();
        let index = WeightedIndex::new(choices.values().copied())
            .map_err(|e| anyhow!("invalid choice weights: {e}"))?;

        Ok(Self { names, index })
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        &self.names[self.index.sample(rng)]
    }
}

pub fn roll_chance<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    rng.random_range(min..=max)
}

pub fn pick<'a, R: Rng + ?Sized>(rng: &mut R, args: &'a [String]) -> Option<&'a str> {
    args.choose(rng).map(String::as_str)
}

/// `機率: n%` without arguments, otherwise one `arg: n%` line per argument.
pub fn format_chance(args: &[String], mut roll: impl FnMut() -> i64) -> String {
    if args.is_empty() {
        return format!("機率: {}%", roll());
    }
    args.iter()
        .map(|arg| format!("{}: {}%", arg, roll()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `運勢: x` without arguments, otherwise one `arg: x` line per argument.
pub fn format_fortune<S: AsRef<str>>(args: &[String], mut roll: impl FnMut() -> S) -> String {
    if args.is_empty() {
        return format!("運勢: {}", roll().as_ref());
    }
    args.iter()
        .map(|arg| format!("{}: {}", arg, roll().as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub const NOTHING_TO_PICK: &str = "Nothing to pick!";

/// Everything the stateless commands need, built once from the config
#[derive(Debug, Clone)]
pub struct RandomReplies {
    pub help: String,
    pub meow: WeightedTable,
    pub fortune: WeightedTable,
    pub chance_min: i64,
    pub chance_max: i64,
}

impl RandomReplies {
    pub fn from_config(commands: &CommandsConfig) -> Result<Self> {
        if commands.chance.min > commands.chance.max {
            return Err(anyhow!("chance.min cannot be greater than chance.max"));
        }

        Ok(Self {
            help: commands.help.message.clone(),
            meow: WeightedTable::new(&commands.meow.choices).context("Invalid meow choices")?,
            fortune: WeightedTable::new(&commands.fortune.choices).context("Invalid fortune choices")?,
            chance_min: commands.chance.min,
            chance_max: commands.chance.max,
        })
    }

    pub fn meow(&self) -> String {
        self.meow.roll(&mut rand::rng()).to_string()
    }

    pub fn chance(&self, args: &[String]) -> String {
        let mut rng = rand::rng();
        format_chance(args, || roll_chance(&mut rng, self.chance_min, self.chance_max))
    }

    pub fn fortune(&self, args: &[String]) -> String {
        let mut rng = rand::rng();
        format_fortune(args, || self.fortune.roll(&mut rng).to_string())
    }

    pub fn pick(&self, args: &[String]) -> String {
        pick(&mut rand::rng(), args)
            .unwrap_or(NOTHING_TO_PICK)
            .to_string()
    }
}
