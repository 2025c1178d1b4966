use std::io::Write;

/// Abstract the host environment to enable testing
pub trait Host: Send + Sync {
    // where to send normal output (e.g., stdout)
    fn output(&mut self) -> impl Write;

    // where to send error output (e.g., stderr)
    fn error(&mut self) -> impl Write;

    /// Terminate the process (although in a test environment this might just set a flag and return).
    fn exit(&mut self, code: i32);

    /// Ask the user a question and read one line of input.
    fn prompt(&mut self, message: &str) -> crate::Result<String>;

    /// Ask the user for a value that must not echo (tokens, passphrases).
    fn prompt_secret(&mut self, message: &str) -> crate::Result<String>;
}

/// Test host that captures output to in-memory buffers and answers prompts
/// from a scripted input queue.
#[cfg(test)]
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub inputs: std::collections::VecDeque<String>,
    pub exit_code: Option<i32>,
}

#[cfg(test)]
impl TestHost {
    pub fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            inputs: std::collections::VecDeque::new(),
            exit_code: None,
        }
    }

    pub fn with_inputs(inputs: &[&str]) -> Self {
        let mut host = Self::new();
        host.inputs = inputs.iter().map(|s| (*s).to_string()).collect();
        host
    }

    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_text(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

#[cfg(test)]
impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        std::io::Cursor::new(&mut self.output_buf)
    }

    fn error(&mut self) -> impl Write {
        std::io::Cursor::new(&mut self.error_buf)
    }

    fn exit(&mut self, code: i32) {
        // In tests, don't actually exit
        self.exit_code = Some(code);
    }

    fn prompt(&mut self, _message: &str) -> crate::Result<String> {
        self.inputs
            .pop_front()
            .ok_or_else(|| ohno::AppError::new("test host ran out of scripted inputs"))
    }

    fn prompt_secret(&mut self, message: &str) -> crate::Result<String> {
        self.prompt(message)
    }
}
