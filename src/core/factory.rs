//! Construction of view-states that need arguments.
//!
//! A factory is bound to the one view-state type it builds through its
//! associated type, so asking it for anything else does not compile.

pub trait ViewModelFactory {
    type ViewModel;

    fn create(&self) -> Self::ViewModel;
}
