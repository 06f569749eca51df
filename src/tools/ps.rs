//! Process table snapshot used to find running emulators.

use crate::tool_traits::ToolArgs;
use crate::tools::{SdkLayout, Tool};

/// `ps -eo pid=,args=`: one line per process, pid then full command line,
/// no header
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessTableArgs;

impl ToolArgs for ProcessTableArgs {
    fn tool(&self) -> Tool {
        Tool::Ps
    }

    fn to_cli_args(&self) -> Vec<String> {
        vec!["-eo".to_string(), "pid=,args=".to_string()]
    }

    fn get_env_vars(&self, _sdk: &SdkLayout) -> Vec<(String, String)> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process_runner::run_captured;

    #[test]
    fn test_process_table_lists_ourselves() {
        let sdk = SdkLayout::new("/nonexistent");
        let output = run_captured(ProcessTableArgs.to_spec(&sdk)).unwrap();
        assert!(output.result.success());

        let me = std::process::id().to_string();
        assert!(output
            .stdout_lines()
            .any(|line| line.split_whitespace().next() == Some(me.as_str())));
    }
}
