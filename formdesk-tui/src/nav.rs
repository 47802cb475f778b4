//! Navigation and screen switching utilities.

use formdesk_core::Resource;

/// Tab order over the entity screens.
pub trait ScreenNav: Sized {
    fn index(&self) -> usize;
    fn from_index(index: usize) -> Option<Self>;
    fn next(&self) -> Self;
    fn previous(&self) -> Self;
}

impl ScreenNav for Resource {
    fn index(&self) -> usize {
        Resource::all()
            .iter()
            .position(|r| r == self)
            .unwrap_or(0)
    }

    fn from_index(index: usize) -> Option<Resource> {
        Resource::all().get(index).copied()
    }

    fn next(&self) -> Resource {
        let all = Resource::all();
        all[(self.index() + 1) % all.len()]
    }

    fn previous(&self) -> Resource {
        let all = Resource::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}
