use std::fmt;

/// Release actions registered during setup.
///
/// Actions run in reverse registration order, exactly once, either on an
/// explicit [`Teardown::run`] or when the guard is dropped. Creating the guard
/// before the first registration means an early `?` during setup still
/// releases everything acquired so far.
#[derive(Default)]
pub struct Teardown {
    actions: Vec<(&'static str, Box<dyn FnOnce()>)>,
}

impl Teardown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer(&mut self, label: &'static str, action: impl FnOnce() + 'static) {
        self.actions.push((label, Box::new(action)));
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.actions.iter().map(|(label, _)| *label)
    }

    pub fn run(&mut self) {
        while let Some((label, action)) = self.actions.pop() {
            tracing::debug!(resource = label, "released");
            action();
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}
