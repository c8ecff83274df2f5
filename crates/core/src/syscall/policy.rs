use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::fatal;

/// How a command that exited with status 0 is judged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckPolicy {
    /// Exit status alone decides.
    #[default]
    NonZeroExit,
    /// Any output (or output matching the error pattern) is a failure.
    OutputGtZero,
}

impl CheckPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckPolicy::NonZeroExit => "nonZeroExit",
            CheckPolicy::OutputGtZero => "outputGTZero",
        }
    }
}

impl fmt::Display for CheckPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the textual policy names. An empty name is the default policy; any
/// other unknown name is logged at fatal severity.
impl FromStr for CheckPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nonZeroExit" | "" => Ok(CheckPolicy::NonZeroExit),
            "outputGTZero" => Ok(CheckPolicy::OutputGtZero),
            other => {
                fatal!("unhandled error check type '{}'", other);
                Err(Error::UnrecognizedPolicy(other.to_string()))
            }
        }
    }
}

impl Serialize for CheckPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{subscriber, LoggerConfig, SharedBuffer, Sink, Sinks};

    #[test]
    fn test_parse_known_names() {
        assert_eq!(
            "nonZeroExit".parse::<CheckPolicy>().unwrap(),
            CheckPolicy::NonZeroExit
        );
        assert_eq!(
            "outputGTZero".parse::<CheckPolicy>().unwrap(),
            CheckPolicy::OutputGtZero
        );
    }

    #[test]
    fn test_empty_name_is_default() {
        assert_eq!("".parse::<CheckPolicy>().unwrap(), CheckPolicy::default());
        assert_eq!(CheckPolicy::default(), CheckPolicy::NonZeroExit);
    }

    #[test]
    fn test_names_round_trip_through_display() {
        for policy in [CheckPolicy::NonZeroExit, CheckPolicy::OutputGtZero] {
            assert_eq!(policy.to_string().parse::<CheckPolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_unknown_name_takes_fatal_path() {
        let buffer = SharedBuffer::new();
        let config = LoggerConfig::default()
            .with_timestamps(false)
            .with_sinks(Sinks::all(Sink::Buffer(buffer.clone())));
        let subscriber = subscriber(&config).unwrap();

        let result = tracing::subscriber::with_default(subscriber, || {
            "outputgtzero".parse::<CheckPolicy>()
        });

        let err = result.unwrap_err();
        assert!(err.is_unrecoverable());
        assert!(matches!(err, Error::UnrecognizedPolicy(ref name) if name == "outputgtzero"));
        assert_eq!(
            buffer.contents(),
            "[ osc:FATAL ] unhandled error check type 'outputgtzero'\n"
        );
    }

    #[test]
    fn test_serializes_as_name() {
        let json = serde_json::to_string(&CheckPolicy::OutputGtZero).unwrap();
        assert_eq!(json, "\"outputGTZero\"");
    }
}
