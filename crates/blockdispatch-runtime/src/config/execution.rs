/// Configuration of the grid executor.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ExecutionConfig {
    /// Run the blocks of a launch on the rayon thread pool.
    ///
    /// Ignored when the `parallel` feature is disabled.
    #[serde(default = "parallel_default")]
    pub parallel: bool,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            parallel: parallel_default(),
        }
    }
}

fn parallel_default() -> bool {
    true
}
