//! Gridline Client — list query controllers, batch mutation, and container composition.

pub mod batch;
pub mod container;
pub mod controller;
pub mod notify;
pub mod optimistic;
pub mod source;

pub use batch::BatchExecutor;
pub use container::{
    ContainerError, ContainerPhase, ContainerRegistry, EntityListContainer, ListPage,
};
pub use controller::ListQueryController;
pub use notify::{BufferedNotifier, TracingNotifier};
pub use optimistic::OptimisticCell;
pub use source::{HttpListSource, InMemoryListSource};
