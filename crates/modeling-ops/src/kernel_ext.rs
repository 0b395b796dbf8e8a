use geom_kernel::{Kernel, KernelIntrospect};

/// The kernel as a pipeline sees it: feature operations through `Kernel`,
/// and a read-only `topology()` view for the selector between them.
///
/// Pipelines hold `&mut dyn KernelBundle` for the whole build. Selection
/// borrows `topology()` for one lookup and hands ids back before the next
/// feature call.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn topology(&self) -> &dyn KernelIntrospect;
}

impl<K> KernelBundle for K
where
    K: Kernel + KernelIntrospect,
{
    fn topology(&self) -> &dyn KernelIntrospect {
        self
    }
}
