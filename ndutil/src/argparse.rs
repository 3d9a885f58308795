//! Declarative command-line options on top of clap.
//!
//! Options are declared by name: `-x` for a short flag, `--name` for a long
//! option, and a bare `name` for a positional. Every parsed value is kept as
//! a string and converted on the way out, so callers choose the type at the
//! point of use.

use clap::{App, Arg};
use itertools::Itertools;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ffi::OsString;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;
use tracing::debug;

quick_error! {
    #[derive(Debug)]
    pub enum ArgError {
        InvalidName(name: String) {
            display("invalid option name {:?}", name)
        }
        Duplicate(name: String) {
            display("option {} is declared twice", name)
        }
        InvalidOptions(name: String, reason: &'static str) {
            display("option {}: {}", name, reason)
        }
        InvalidChoice(name: String, value: String) {
            display("{:?} is not one of the choices for {}", value, name)
        }
        Missing(name: String) {
            display("no value for option {}", name)
        }
        Conversion(name: String, value: String) {
            display("cannot convert {:?} given for {}", value, name)
        }
        Parse(err: clap::Error) {
            from()
            display("{}", err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ArgError>;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct OptionFlags(u8);

impl OptionFlags {
    pub const NONE: OptionFlags = OptionFlags(0b00000);
    pub const REQUIRED: OptionFlags = OptionFlags(0b00001);
    pub const MULTIPLE: OptionFlags = OptionFlags(0b00010);
    /// Switch that stores "1" when given.
    pub const ENABLER: OptionFlags = OptionFlags(0b00100);
    /// Switch that stores "0" when given and "1" otherwise.
    pub const DISABLER: OptionFlags = OptionFlags(0b01000);
    /// Switch that stores how many times it was given.
    pub const COUNTER: OptionFlags = OptionFlags(0b10000);

    pub fn contains(self, other: OptionFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_required(self) -> bool {
        self.contains(Self::REQUIRED)
    }

    pub fn is_multiple(self) -> bool {
        self.contains(Self::MULTIPLE)
    }

    pub fn is_enabler(self) -> bool {
        self.contains(Self::ENABLER)
    }

    pub fn is_disabler(self) -> bool {
        self.contains(Self::DISABLER)
    }

    pub fn is_counter(self) -> bool {
        self.contains(Self::COUNTER)
    }

    pub fn is_switch(self) -> bool {
        self.is_enabler() || self.is_disabler() || self.is_counter()
    }
}

impl BitOr for OptionFlags {
    type Output = OptionFlags;

    fn bitor(self, rhs: OptionFlags) -> OptionFlags {
        OptionFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for OptionFlags {
    fn bitor_assign(&mut self, rhs: OptionFlags) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum Kind {
    Short,
    Long,
    Positional,
}

fn classify(name: &str) -> Option<Kind> {
    let word = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if let Some(long) = name.strip_prefix("--") {
        let first = long.chars().next()?;
        if first.is_ascii_alphanumeric() && long.chars().all(|c| word(c) || c == '-') {
            return Some(Kind::Long);
        }
        None
    } else if let Some(short) = name.strip_prefix('-') {
        let mut chars = short.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphanumeric() => Some(Kind::Short),
            _ => None,
        }
    } else if !name.is_empty() && name.chars().all(word) {
        Some(Kind::Positional)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
struct OptionSpec {
    name: String,
    kind: Kind,
    flags: OptionFlags,
    default: Option<String>,
    choices: Vec<String>,
}

impl OptionSpec {
    fn to_arg(&self, position: u64) -> Arg<'_, '_> {
        let name = self.name.as_str();
        let mut arg = Arg::with_name(name)
            .required(self.flags.is_required())
            .multiple(self.flags.is_multiple() || self.flags.is_counter());
        arg = match self.kind {
            Kind::Short => arg.short(&name[1..]),
            Kind::Long => arg.long(&name[2..]),
            Kind::Positional => arg.index(position),
        };
        if self.kind != Kind::Positional && !self.flags.is_switch() {
            arg = arg
                .takes_value(true)
                .value_name(name.trim_start_matches('-'))
                .allow_hyphen_values(!self.flags.is_multiple());
            if self.flags.is_multiple() {
                arg = arg.use_delimiter(true);
            }
        }
        self.choices
            .iter()
            .fold(arg, |arg, choice| arg.possible_value(choice))
    }

    fn switch_value(&self, occurrences: u64) -> String {
        let given = occurrences > 0;
        if self.flags.is_counter() {
            occurrences.to_string()
        } else if self.flags.is_enabler() == given {
            "1".to_owned()
        } else {
            "0".to_owned()
        }
    }
}

#[derive(Debug)]
pub struct ArgParse {
    program: String,
    specs: Vec<OptionSpec>,
}

impl ArgParse {
    pub fn new(program: &str) -> Self {
        ArgParse {
            program: program.to_owned(),
            specs: vec![],
        }
    }

    pub fn add(&mut self, name: &str, flags: OptionFlags) -> Result<()> {
        self.declare(name, None, flags, &[])
    }

    pub fn add_with_default(&mut self, name: &str, default: &str, flags: OptionFlags) -> Result<()> {
        self.declare(name, Some(default), flags, &[])
    }

    pub fn add_choices(&mut self, name: &str, flags: OptionFlags, choices: &[&str]) -> Result<()> {
        self.declare(name, None, flags, choices)
    }

    /// Declares an option, rejecting names and flag combinations that could
    /// never parse.
    pub fn declare(
        &mut self,
        name: &str,
        default: Option<&str>,
        flags: OptionFlags,
        choices: &[&str],
    ) -> Result<()> {
        let kind = classify(name).ok_or_else(|| ArgError::InvalidName(name.to_owned()))?;
        if self.exists(name) {
            return Err(ArgError::Duplicate(name.to_owned()));
        }
        let invalid = |reason| Err(ArgError::InvalidOptions(name.to_owned(), reason));

        let switches = [flags.is_enabler(), flags.is_disabler(), flags.is_counter()];
        if switches.iter().filter(|&&s| s).count() > 1 {
            return invalid("only one of enabler, disabler and counter may be set");
        }
        if flags.is_switch() {
            if kind == Kind::Positional {
                return invalid("positional arguments cannot be switches");
            }
            if flags.is_required() || flags.is_multiple() {
                return invalid("switches cannot be required or multiple");
            }
            if default.is_some() || !choices.is_empty() {
                return invalid("switches take no value");
            }
        }
        if flags.is_required() && default.is_some() {
            return invalid("required options cannot have a default");
        }
        if kind == Kind::Positional
            && self
                .specs
                .iter()
                .any(|s| s.kind == Kind::Positional && s.flags.is_multiple())
        {
            return invalid("positional declared after a multiple positional");
        }
        if let Some(default) = default {
            if !choices.is_empty() && !choices.contains(&default) {
                return Err(ArgError::InvalidChoice(name.to_owned(), default.to_owned()));
            }
        }

        self.specs.push(OptionSpec {
            name: name.to_owned(),
            kind,
            flags,
            default: default.map(str::to_owned),
            choices: choices.iter().map(|&c| c.to_owned()).collect(),
        });
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.specs.iter().any(|s| s.name == name)
    }

    /// Parses `args`, whose first item is the program name.
    pub fn parse<I, T>(&self, args: I) -> Result<Params>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut position = 0;
        let mut app = App::new(self.program.as_str());
        for spec in &self.specs {
            if spec.kind == Kind::Positional {
                position += 1;
            }
            app = app.arg(spec.to_arg(position));
        }
        let matches = app.get_matches_from_safe(args)?;

        let mut params = Params::default();
        for spec in &self.specs {
            let occurrences = matches.occurrences_of(&spec.name);
            if spec.flags.is_switch() {
                params.insert(&spec.name, vec![spec.switch_value(occurrences)], occurrences > 0);
            } else if let Some(values) = matches.values_of(&spec.name) {
                params.insert(&spec.name, values.map(str::to_owned).collect(), true);
            } else if let Some(default) = &spec.default {
                params.insert(&spec.name, vec![default.clone()], false);
            }
        }
        debug!(program = %self.program, set = params.set.len(), "parsed arguments");
        Ok(params)
    }
}

fn convert<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| ArgError::Conversion(name.to_owned(), raw.to_owned()))
}

/// Values produced by `ArgParse::parse`, including declared defaults.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    data: BTreeMap<String, Vec<String>>,
    set: BTreeSet<String>,
}

impl Params {
    fn insert(&mut self, name: &str, values: Vec<String>, explicit: bool) {
        if explicit {
            self.set.insert(name.to_owned());
        }
        self.data.insert(name.to_owned(), values);
    }

    /// True only when the value came from the command line.
    pub fn is_set(&self, name: &str) -> bool {
        self.set.contains(name)
    }

    pub fn raw(&self, name: &str) -> Result<&str> {
        self.data
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
            .ok_or_else(|| ArgError::Missing(name.to_owned()))
    }

    pub fn get<T: FromStr>(&self, name: &str) -> Result<T> {
        convert(name, self.raw(name)?)
    }

    /// `default` unless the option was given on the command line.
    pub fn get_or<T: FromStr>(&self, name: &str, default: T) -> Result<T> {
        if self.is_set(name) {
            self.get(name)
        } else {
            Ok(default)
        }
    }

    pub fn get_with<T, F>(&self, name: &str, convert: F) -> Result<T>
    where
        F: FnOnce(&str) -> T,
    {
        self.raw(name).map(convert)
    }

    /// Maps the raw value through `table`, falling back to `default` for
    /// values the table does not know.
    pub fn lookup<'m, T>(
        &self,
        name: &str,
        table: &'m HashMap<&str, T>,
        default: &'m T,
    ) -> Result<&'m T> {
        let raw = self.raw(name)?;
        Ok(table.get(raw).unwrap_or(default))
    }

    /// Every value of a multiple option; empty when it has none.
    pub fn values<'p, T: FromStr + 'p>(
        &'p self,
        name: &'p str,
    ) -> impl Iterator<Item = Result<T>> + 'p {
        self.data
            .get(name)
            .into_iter()
            .flatten()
            .map(move |raw| convert(name, raw))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = self
            .data
            .iter()
            .map(|(name, values)| format!("{}={}", name, values.join(",")))
            .join("\n");
        write!(f, "{}", text)
    }
}
