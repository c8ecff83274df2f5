use std::io::Write;

use anyhow::Result;
use osc_common_core::SyscallOutput;

/// Write the result: pretty JSON, or the captured output when there is any.
pub fn print_result(
    result: &SyscallOutput,
    json: bool,
    quiet: bool,
    out: &mut impl Write,
) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
    } else if !quiet && !result.output.is_empty() {
        writeln!(out, "{}", result.output)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use osc_common_core::Failure;

    #[test]
    fn test_plain_output() {
        let mut out = Vec::new();
        print_result(
            &SyscallOutput::succeeded("hello".into(), Some(0)),
            false,
            false,
            &mut out,
        )
        .unwrap();
        assert_eq!(out, b"hello\n");
    }

    #[test]
    fn test_quiet_and_empty_print_nothing() {
        let mut out = Vec::new();
        print_result(
            &SyscallOutput::succeeded("hello".into(), Some(0)),
            false,
            true,
            &mut out,
        )
        .unwrap();
        print_result(
            &SyscallOutput::succeeded(String::new(), Some(0)),
            false,
            false,
            &mut out,
        )
        .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_json_ignores_quiet() {
        let mut out = Vec::new();
        let result = SyscallOutput::failed(Failure::OutputPresent, "x".into(), Some(0));
        print_result(&result, true, true, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["failure"]["kind"], "outputPresent");
        assert_eq!(value["exitCode"], 0);
    }
}
