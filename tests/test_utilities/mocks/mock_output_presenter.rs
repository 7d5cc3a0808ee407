use bom_convert::prelude::*;
use std::sync::{Arc, Mutex};

/// Mock OutputPresenter for testing that captures presented bytes
#[derive(Default, Clone)]
pub struct MockOutputPresenter {
    pub presented: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockOutputPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_output(&self) -> Option<String> {
        self.presented
            .lock()
            .unwrap()
            .last()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn present_count(&self) -> usize {
        self.presented.lock().unwrap().len()
    }
}

impl OutputPresenter for MockOutputPresenter {
    fn present(&self, content: &[u8]) -> Result<()> {
        self.presented.lock().unwrap().push(content.to_vec());
        Ok(())
    }
}
