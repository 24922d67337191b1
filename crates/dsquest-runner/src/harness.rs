//! The Python harness that wraps lesson source.
//!
//! The harness points `sys.stderr` at the real stdout, executes the lesson
//! file as `__main__` with unbuffered I/O, records a traceback on failure and
//! finally writes one marked JSON line. Everything on stdout before the last
//! marker is lesson output, including text written straight to the file
//! descriptor by `os.system`, subprocesses or C extensions.

use serde::Deserialize;

use dsquest_core::traits::{ExecutionResult, Fault, Output};

/// Prefix of the result line. The last occurrence on stdout is the
/// harness's own.
pub const RESULT_MARKER: &str = "__DSQUEST_RESULT__";

pub const HARNESS_PY: &str = r#"import json
import sys
import traceback

_lesson_path = sys.argv[1]
_real_out, _real_err = sys.stdout, sys.stderr
_fault = None
try:
    with open(_lesson_path, encoding="utf-8") as _f:
        _code = compile(_f.read(), "<lesson>", "exec")
    sys.stderr = _real_out
    exec(_code, {"__name__": "__main__", "__builtins__": __builtins__})
except SystemExit as _exit:
    if _exit.code not in (None, 0):
        _fault = "SystemExit: %s\n" % (_exit.code,)
except BaseException:
    _t, _v, _tb = sys.exc_info()
    _fault = "".join(traceback.format_exception(_t, _v, _tb.tb_next if _tb else None))
finally:
    sys.stdout, sys.stderr = _real_out, _real_err

_real_out.write("__DSQUEST_RESULT__" + json.dumps({"fault": _fault}) + "\n")
_real_out.flush()
"#;

#[derive(Debug, Deserialize)]
struct HarnessResult {
    fault: Option<String>,
}

/// Interpret the harness process output.
///
/// Without a result line the interpreter left early. A zero exit status
/// (`os._exit(0)`) is a normal finish; anything else is a fault.
pub fn parse_harness_output(stdout: &str, stderr: &str, exit_code: Option<i32>) -> ExecutionResult {
    let result = stdout.rfind(RESULT_MARKER).and_then(|idx| {
        let json = stdout[idx + RESULT_MARKER.len()..].trim();
        serde_json::from_str::<HarnessResult>(json)
            .ok()
            .map(|result| (&stdout[..idx], result))
    });

    match result {
        Some((output, HarnessResult { fault: None })) => Ok(Output {
            text: output.to_string(),
        }),
        Some((output, HarnessResult {
            fault: Some(diagnostic),
        })) => Err(Fault {
            partial: output.to_string(),
            diagnostic,
        }),
        None if exit_code == Some(0) => Ok(Output {
            text: stdout.to_string(),
        }),
        None => {
            let diagnostic = if stderr.trim().is_empty() {
                match exit_code {
                    Some(code) => format!("interpreter exited with status {code}"),
                    None => "interpreter was terminated by a signal".to_string(),
                }
            } else {
                stderr.to_string()
            };
            Err(Fault {
                partial: stdout.to_string(),
                diagnostic,
            })
        }
    }
}
