//! Hook slot store and the `use_state` / `use_reducer` hooks.
//!
//! Slots are addressed purely by call order inside one component invocation.
//! The store is carried verbatim across re-invocations of the same instance,
//! which is the whole persistence mechanism; there are no keys.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::node::RenderNodeId;
use crate::root::UpdateHandle;

/// Per component-instance array of persisted value cells.
#[derive(Clone, Default)]
pub(crate) struct HookSlots {
    inner: Rc<RefCell<SlotStore>>,
}

#[derive(Default)]
struct SlotStore {
    cells: Vec<Box<dyn Any>>,
    /// Slot count committed by the last completed invocation.
    committed: Option<usize>,
}

impl HookSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn cell_at<T: 'static>(&self, index: usize, init: impl FnOnce() -> T) -> StateCell<T> {
        let mut store = self.inner.borrow_mut();
        if index == store.cells.len() {
            store.cells.push(Box::new(StateCell::new(init())));
        }
        let cell = store
            .cells
            .get(index)
            .expect("hook slot cursor out of range");
        cell.downcast_ref::<StateCell<T>>()
            .unwrap_or_else(|| {
                panic!("hook slot {index} holds a different type; hooks must run in a stable order")
            })
            .clone()
    }

    /// Records the slot count used by a finished invocation. A count change
    /// between renders is the positional-state invariant violation; it is
    /// reported instead of silently shifting values between slots.
    pub fn commit(&self, used: usize) -> Result<(), (usize, usize)> {
        let mut store = self.inner.borrow_mut();
        if let Some(previous) = store.committed {
            if previous != used {
                return Err((previous, used));
            }
        }
        store.committed = Some(used);
        Ok(())
    }
}

/// One persisted hook value, shared between the slot store and any setters
/// handed out for it.
pub(crate) struct StateCell<T> {
    value: Rc<RefCell<T>>,
}

impl<T> StateCell<T> {
    fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    pub fn replace(&self, next: T) {
        *self.value.borrow_mut() = next;
    }
}

impl<T: Clone> StateCell<T> {
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

/// Frame describing the component instance currently being invoked.
pub(crate) struct InstanceFrame {
    pub node: RenderNodeId,
    pub slots: HookSlots,
    pub cursor: Cell<usize>,
    pub driver: UpdateHandle,
}

thread_local! {
    static INSTANCE_STACK: RefCell<Vec<InstanceFrame>> = RefCell::new(Vec::new());
}

/// Installs an instance frame for the duration of one component invocation.
/// Dropping the guard restores the previous frame, so nested invocations are
/// safe as long as calls stay synchronous.
pub(crate) struct InstanceGuard(());

impl InstanceGuard {
    pub fn enter(frame: InstanceFrame) -> Self {
        INSTANCE_STACK.with(|stack| stack.borrow_mut().push(frame));
        Self(())
    }

    pub fn cursor(&self) -> usize {
        with_current_frame(|frame| frame.cursor.get())
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        INSTANCE_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

fn with_current_frame<R>(f: impl FnOnce(&InstanceFrame) -> R) -> R {
    INSTANCE_STACK.with(|stack| {
        let stack = stack.borrow();
        let frame = stack
            .last()
            .expect("hook called outside of a component render");
        f(frame)
    })
}

/// Claims the next hook slot of the current instance and advances the cursor.
fn next_cell<T: 'static>(init: impl FnOnce() -> T) -> (StateCell<T>, RenderNodeId, UpdateHandle) {
    with_current_frame(|frame| {
        let index = frame.cursor.get();
        frame.cursor.set(index + 1);
        let cell = frame.slots.cell_at(index, init);
        (cell, frame.node, frame.driver.clone())
    })
}

/// Persistent component-local state.
///
/// Returns the current value and a setter. The setter writes the slot and
/// synchronously re-renders the owning component's subtree. Panics when
/// called outside a component invocation.
pub fn use_state<T>(init: impl FnOnce() -> T) -> (T, SetState<T>)
where
    T: Clone + PartialEq + 'static,
{
    let (cell, node, driver) = next_cell(init);
    let value = cell.get();
    (value, SetState { cell, node, driver })
}

/// Reducer-style state: `dispatch(action)` folds the action into the current
/// value with `reducer` and feeds the result through the same update path as
/// [`use_state`]'s setter, including the equal-value skip.
pub fn use_reducer<S, A>(
    reducer: impl Fn(&S, A) -> S + 'static,
    init: impl FnOnce() -> S,
) -> (S, Dispatch<S, A>)
where
    S: Clone + PartialEq + 'static,
    A: 'static,
{
    let (cell, node, driver) = next_cell(init);
    let value = cell.get();
    (
        value,
        Dispatch {
            cell,
            reducer: Rc::new(reducer),
            node,
            driver,
        },
    )
}

/// Setter half of [`use_state`]. Cheap to clone and safe to stash in event
/// handlers; it stays bound to the slot and instance it was created for.
pub struct SetState<T> {
    cell: StateCell<T>,
    node: RenderNodeId,
    driver: UpdateHandle,
}

impl<T> SetState<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Writes the slot and re-renders the owning component. Setting a value
    /// equal to the current one is a complete no-op: no write, no render.
    /// That skip is what keeps setters usable without starting an endless
    /// render loop.
    pub fn set(&self, next: T) {
        let unchanged = self.cell.with(|current| *current == next);
        if unchanged {
            return;
        }
        self.cell.replace(next);
        self.driver.update(self.node);
    }

    /// Functional form: computes the next value from the current one.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.cell.with(|current| f(current));
        self.set(next);
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            node: self.node,
            driver: self.driver.clone(),
        }
    }
}

/// Dispatch half of [`use_reducer`].
pub struct Dispatch<S, A> {
    cell: StateCell<S>,
    reducer: Rc<dyn Fn(&S, A) -> S>,
    node: RenderNodeId,
    driver: UpdateHandle,
}

impl<S, A> Dispatch<S, A>
where
    S: Clone + PartialEq + 'static,
{
    pub fn dispatch(&self, action: A) {
        let next = self.cell.with(|current| (self.reducer)(current, action));
        let unchanged = self.cell.with(|current| *current == next);
        if unchanged {
            return;
        }
        self.cell.replace(next);
        self.driver.update(self.node);
    }
}

impl<S, A> Clone for Dispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            reducer: Rc::clone(&self.reducer),
            node: self.node,
            driver: self.driver.clone(),
        }
    }
}
