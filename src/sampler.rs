//! Load average sampling from `/proc/loadavg`

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SampleError;

/// Default load average source
pub const LOADAVG_PATH: &str = "/proc/loadavg";

/// Source of the current load average
pub trait LoadSampler {
    /// Current 1-minute load average. No retries; the caller decides.
    fn sample(&mut self) -> Result<f64, SampleError>;
}

/// Reads the first field of a procfs-style loadavg file
#[derive(Debug, Clone)]
pub struct ProcLoadAvg {
    path: PathBuf,
}

impl ProcLoadAvg {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ProcLoadAvg {
    fn default() -> Self {
        Self::new(LOADAVG_PATH)
    }
}

impl LoadSampler for ProcLoadAvg {
    fn sample(&mut self) -> Result<f64, SampleError> {
        let content = fs::read_to_string(&self.path).map_err(|source| SampleError::Read {
            path: self.path.clone(),
            source,
        })?;
        parse_loadavg(&content)
    }
}

/// Parse the 1-minute load average (first whitespace-separated field).
///
/// e.g. `"0.52 0.58 0.59 2/1081 123456\n"` -> `0.52`
pub fn parse_loadavg(content: &str) -> Result<f64, SampleError> {
    content
        .split_whitespace()
        .next()
        .and_then(|field| field.parse::<f64>().ok())
        .ok_or_else(|| SampleError::Parse {
            input: content.trim().to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_loadavg_valid() {
        let load = parse_loadavg("0.52 0.58 0.59 2/1081 123456\n").unwrap();
        assert_eq!(load, 0.52);
    }

    #[test]
    fn test_parse_loadavg_single_field() {
        assert_eq!(parse_loadavg("3.75").unwrap(), 3.75);
    }

    #[test]
    fn test_parse_loadavg_leading_whitespace() {
        assert_eq!(parse_loadavg("  1.00 2.00").unwrap(), 1.0);
    }

    #[test]
    fn test_parse_loadavg_empty() {
        assert!(matches!(parse_loadavg(""), Err(SampleError::Parse { .. })));
        assert!(matches!(parse_loadavg(" \n"), Err(SampleError::Parse { .. })));
    }

    #[test]
    fn test_parse_loadavg_not_a_number() {
        let err = parse_loadavg("abc 0.1 0.2").unwrap_err();
        match err {
            SampleError::Parse { input } => assert_eq!(input, "abc 0.1 0.2"),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_sample_missing_file() {
        let mut sampler = ProcLoadAvg::new("/nonexistent/loadring/loadavg");
        assert!(matches!(sampler.sample(), Err(SampleError::Read { .. })));
    }
}
