use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::arena::action::AgentAction;

use super::{Agent, PlayerView};

/// Shared storage for actions fed in from outside the engine.
pub type ActionQueue = Rc<RefCell<VecDeque<AgentAction>>>;

/// Stands in for a person. Each decision takes the next queued action.
/// When the queue runs dry it checks if that's free and folds if not.
#[derive(Debug, Clone, Default)]
pub struct HumanProxyAgent {
    actions: ActionQueue,
}

impl HumanProxyAgent {
    pub fn new(actions: ActionQueue) -> Self {
        Self { actions }
    }

    /// A handle to push actions into after the agent has been
    /// given to a session.
    pub fn queue(&self) -> ActionQueue {
        self.actions.clone()
    }

    pub fn push(&self, action: AgentAction) {
        self.actions.borrow_mut().push_back(action);
    }
}

impl Agent for HumanProxyAgent {
    fn act(&mut self, view: &PlayerView) -> AgentAction {
        let queued = self.actions.borrow_mut().pop_front();
        queued.unwrap_or(if view.to_call == 0 {
            AgentAction::Call
        } else {
            AgentAction::Fold
        })
    }
}
