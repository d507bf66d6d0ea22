use crate::error::ConfigError;

/// Startup parameters, given positionally as
/// `<required wood> <required gold> <build peasants>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerParams {
    pub required_wood: u32,
    pub required_gold: u32,
    pub build_peasants: bool,
}

impl PlannerParams {
    pub const COUNT: usize = 3;

    pub fn new(required_wood: u32, required_gold: u32, build_peasants: bool) -> Self {
        Self {
            required_wood,
            required_gold,
            build_peasants,
        }
    }

    pub fn parse<S: AsRef<str>>(params: &[S]) -> Result<Self, ConfigError> {
        let [wood, gold, build] = params else {
            return Err(ConfigError::WrongParameterCount {
                expected: Self::COUNT,
                found: params.len(),
            });
        };

        Ok(Self {
            required_wood: parse_amount("required wood", wood.as_ref())?,
            required_gold: parse_amount("required gold", gold.as_ref())?,
            build_peasants: parse_flag("build peasants", build.as_ref())?,
        })
    }
}

fn parse_amount(name: &'static str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidAmount {
            name,
            value: value.to_string(),
        })
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}
