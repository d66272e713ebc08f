use std::fmt;

use tracing::{debug, info, warn};

use crate::cache::token::{AccessToken, TokenScope};
use crate::error::{require, BridgeResult};
use crate::sources::lean::LeanClient;

/// States of the customer bootstrap. Every step is one awaited vendor call;
/// any failure lands in `Failed` and nothing after it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Start,
    ApiTokenObtained,
    CustomerCreated,
    CustomerTokenObtained,
    Done,
    Failed,
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowState::Start => "START",
            WorkflowState::ApiTokenObtained => "API_TOKEN_OBTAINED",
            WorkflowState::CustomerCreated => "CUSTOMER_CREATED",
            WorkflowState::CustomerTokenObtained => "CUSTOMER_TOKEN_OBTAINED",
            WorkflowState::Done => "DONE",
            WorkflowState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// What the browser needs to open the Lean SDK for a customer.
#[derive(Debug, Clone)]
pub struct CustomerSession {
    pub customer_id: String,
    pub customer_token: AccessToken,
}

#[derive(Debug)]
pub struct WorkflowOutcome {
    /// every state visited, in order
    pub trail: Vec<WorkflowState>,
    pub result: BridgeResult<CustomerSession>,
}

impl WorkflowOutcome {
    pub fn last_state(&self) -> WorkflowState {
        self.trail.last().copied().unwrap_or(WorkflowState::Start)
    }
}

struct Workflow<'a> {
    name: &'static str,
    lean: &'a LeanClient,
    trail: Vec<WorkflowState>,
}

impl<'a> Workflow<'a> {
    fn new(name: &'static str, lean: &'a LeanClient) -> Self {
        Self { name, lean, trail: vec![WorkflowState::Start] }
    }

    fn advance(&mut self, next: WorkflowState) {
        if let Some(current) = self.trail.last() {
            debug!(workflow = self.name, "{} -> {}", current, next);
        }
        self.trail.push(next);
    }

    fn finish(mut self, result: BridgeResult<CustomerSession>) -> WorkflowOutcome {
        match &result {
            Ok(session) => {
                self.advance(WorkflowState::Done);
                info!(workflow = self.name, customer_id = %session.customer_id, "workflow done");
            }
            Err(err) => {
                warn!(workflow = self.name, state = %self.trail.last().copied().unwrap_or(WorkflowState::Start), "workflow failed: {}", err);
                self.advance(WorkflowState::Failed);
            }
        }
        WorkflowOutcome { trail: self.trail, result }
    }
}

/// API token → create customer → customer-scoped token.
///
/// No rollback: a customer created before a failed elevation stays on the vendor side.
pub async fn initialize_customer(lean: &LeanClient, app_user_id: &str) -> WorkflowOutcome {
    let mut workflow = Workflow::new("initialize_customer", lean);
    let result = run_initialize(&mut workflow, app_user_id).await;
    workflow.finish(result)
}

async fn run_initialize(workflow: &mut Workflow<'_>, app_user_id: &str) -> BridgeResult<CustomerSession> {
    require("app_user_id", app_user_id)?;

    workflow.lean.get_valid_token(&TokenScope::Api).await?;
    workflow.advance(WorkflowState::ApiTokenObtained);

    let customer = workflow.lean.create_customer(app_user_id).await?;
    workflow.advance(WorkflowState::CustomerCreated);

    let customer_token = workflow.lean.get_customer_token(&customer.customer_id).await?;
    workflow.advance(WorkflowState::CustomerTokenObtained);

    Ok(CustomerSession { customer_id: customer.customer_id, customer_token })
}

/// Two-step variant for a customer that already exists.
pub async fn get_tokens_for_customer(lean: &LeanClient, customer_id: &str) -> WorkflowOutcome {
    let mut workflow = Workflow::new("get_tokens_for_customer", lean);
    let result = run_get_tokens(&mut workflow, customer_id).await;
    workflow.finish(result)
}

async fn run_get_tokens(workflow: &mut Workflow<'_>, customer_id: &str) -> BridgeResult<CustomerSession> {
    require("customer_id", customer_id)?;

    workflow.lean.get_valid_token(&TokenScope::Api).await?;
    workflow.advance(WorkflowState::ApiTokenObtained);

    let customer_token = workflow.lean.get_customer_token(customer_id).await?;
    workflow.advance(WorkflowState::CustomerTokenObtained);

    Ok(CustomerSession { customer_id: customer_id.to_string(), customer_token })
}
