use ndutil::argparse::{ArgError, ArgParse, OptionFlags, Params};
use std::ffi::OsString;

pub const MAX_DIMS: usize = 4;

quick_error! {
    #[derive(Debug)]
    pub enum WalkError {
        Args(err: ArgError) {
            from()
            display("{}", err)
        }
        Dimensions(n: usize) {
            display("shapes of 1 to {} dimensions are supported, got {}", MAX_DIMS, n)
        }
        DimensionMismatch(expected: usize, actual: usize) {
            display("a {}-dimensional walk was given a {}-dimensional shape", expected, actual)
        }
        ZeroStep {
            display("--step must be at least 1")
        }
        Io(err: std::io::Error) {
            from()
            display("{}", err)
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Order {
    Forward,
    Reverse,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WalkSettings {
    pub shape: Vec<usize>,
    /// Cells to skip before the first one printed.
    pub start: usize,
    pub step: usize,
    pub order: Order,
    pub limit_mem: Option<u64>,
    pub verbosity: u64,
    pub positions: bool,
}

impl Default for WalkSettings {
    fn default() -> Self {
        WalkSettings {
            shape: vec![1],
            start: 0,
            step: 1,
            order: Order::Forward,
            limit_mem: None,
            verbosity: 0,
            positions: true,
        }
    }
}

pub fn declare() -> Result<ArgParse, ArgError> {
    let mut ap = ArgParse::new("ndwalk");
    ap.add("--shape", OptionFlags::REQUIRED | OptionFlags::MULTIPLE)?;
    ap.add_with_default("--start", "0", OptionFlags::NONE)?;
    ap.add_with_default("--step", "1", OptionFlags::NONE)?;
    ap.declare("--order", Some("forward"), OptionFlags::NONE, &["forward", "reverse"])?;
    ap.add("--limit-mem", OptionFlags::NONE)?;
    ap.add("-v", OptionFlags::COUNTER)?;
    ap.add("--no-positions", OptionFlags::DISABLER)?;
    Ok(ap)
}

impl WalkSettings {
    pub fn from_args<I, T>(args: I) -> Result<Self, WalkError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let params = declare()?.parse(args)?;
        WalkSettings::from_params(&params)
    }

    pub fn from_params(params: &Params) -> Result<Self, WalkError> {
        let defaults = WalkSettings::default();
        let shape = params
            .values::<usize>("--shape")
            .collect::<Result<Vec<_>, _>>()?;
        if shape.is_empty() || shape.len() > MAX_DIMS {
            return Err(WalkError::Dimensions(shape.len()));
        }
        let step: usize = params.get("--step")?;
        if step == 0 {
            return Err(WalkError::ZeroStep);
        }
        let order = params.get_with("--order", |raw| match raw {
            "reverse" => Order::Reverse,
            _ => Order::Forward,
        })?;
        let limit_mem = if params.is_set("--limit-mem") {
            Some(params.get::<u64>("--limit-mem")?)
        } else {
            defaults.limit_mem
        };
        Ok(WalkSettings {
            shape,
            start: params.get_or("--start", defaults.start)?,
            step,
            order,
            limit_mem,
            verbosity: params.get("-v")?,
            positions: params.get::<u8>("--no-positions")? != 0,
        })
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
