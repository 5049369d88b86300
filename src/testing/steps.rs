//! The fixed smoke-test sequence
//!
//! Each step declares the identifiers it needs, performs one logical
//! operation against the API and reports one or more [`TestResult`]s.
//! A step with missing prerequisites fails without touching the network.

use chrono::{Days, Local};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::Fixtures;
use crate::http::{resource_path, Transport};

use super::envelope::{expect_data_object, expect_envelope, expect_ok, extract_id, StepFailure};
use super::report::{payload_of, TestResult};
use super::state::{SharedState, StateKey};

/// One step of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestStep {
    HealthCheck,
    RootEndpoint,
    CreateUsers,
    AddFunds,
    CreateListing,
    ListListings,
    CreateProposal,
    AcceptProposal,
    GenerateContract,
    FarmerDashboard,
    BuyerDashboard,
}

/// Execution order
pub const SEQUENCE: [TestStep; 11] = [
    TestStep::HealthCheck,
    TestStep::RootEndpoint,
    TestStep::CreateUsers,
    TestStep::AddFunds,
    TestStep::CreateListing,
    TestStep::ListListings,
    TestStep::CreateProposal,
    TestStep::AcceptProposal,
    TestStep::GenerateContract,
    TestStep::FarmerDashboard,
    TestStep::BuyerDashboard,
];

impl TestStep {
    pub fn name(&self) -> &'static str {
        match self {
            TestStep::HealthCheck => "Health Check",
            TestStep::RootEndpoint => "Root Endpoint",
            TestStep::CreateUsers => "Create User Profiles",
            TestStep::AddFunds => "Add Funds to Wallet",
            TestStep::CreateListing => "Create Listing",
            TestStep::ListListings => "Get All Listings",
            TestStep::CreateProposal => "Create Proposal",
            TestStep::AcceptProposal => "Accept Proposal",
            TestStep::GenerateContract => "Generate Contract",
            TestStep::FarmerDashboard => "Farmer Dashboard",
            TestStep::BuyerDashboard => "Buyer Dashboard",
        }
    }

    /// Identifiers that must exist before the step may run
    pub fn requires(&self) -> &'static [StateKey] {
        match self {
            TestStep::HealthCheck
            | TestStep::RootEndpoint
            | TestStep::CreateUsers
            | TestStep::ListListings => &[],
            TestStep::AddFunds | TestStep::BuyerDashboard => &[StateKey::BuyerId],
            TestStep::CreateListing | TestStep::FarmerDashboard => &[StateKey::FarmerId],
            TestStep::CreateProposal => &[StateKey::BuyerId, StateKey::ListingId],
            TestStep::AcceptProposal | TestStep::GenerateContract => &[StateKey::ProposalId],
        }
    }

    /// Run the step, storing produced identifiers in `state` on success
    pub async fn execute(
        &self,
        state: &mut SharedState,
        transport: &dyn Transport,
        fixtures: &Fixtures,
    ) -> Vec<TestResult> {
        let name = self.name();

        let missing = state.missing(self.requires());
        if !missing.is_empty() {
            return vec![settle(name, Err(StepFailure::MissingDependency(missing)))];
        }

        match self {
            TestStep::HealthCheck => vec![settle(name, health_check(transport).await)],
            TestStep::RootEndpoint => vec![settle(name, root_endpoint(transport).await)],
            TestStep::CreateUsers => create_users(state, transport, fixtures).await,
            TestStep::AddFunds => vec![settle(name, add_funds(state, transport, fixtures).await)],
            TestStep::CreateListing => {
                vec![settle(name, create_listing(state, transport, fixtures).await)]
            }
            TestStep::ListListings => vec![settle(name, list_listings(transport).await)],
            TestStep::CreateProposal => {
                vec![settle(name, create_proposal(state, transport, fixtures).await)]
            }
            TestStep::AcceptProposal => vec![settle(name, accept_proposal(state, transport).await)],
            TestStep::GenerateContract => {
                vec![settle(name, generate_contract(state, transport).await)]
            }
            TestStep::FarmerDashboard => {
                let farmer_id = require(state, StateKey::FarmerId);
                let path = resource_path(&["dashboard", "farmer", farmer_id.as_str()]);
                vec![settle(name, dashboard(transport, &path).await)]
            }
            TestStep::BuyerDashboard => {
                let buyer_id = require(state, StateKey::BuyerId);
                let path = resource_path(&["dashboard", "buyer", buyer_id.as_str()]);
                vec![settle(name, dashboard(transport, &path).await)]
            }
        }
    }
}

/// What a passing check reports
struct Passed {
    message: String,
    payload: Option<Value>,
}

impl Passed {
    fn new(message: impl Into<String>, payload: Option<Value>) -> Self {
        Self {
            message: message.into(),
            payload,
        }
    }
}

fn settle(name: &str, outcome: Result<Passed, StepFailure>) -> TestResult {
    match outcome {
        Ok(passed) => TestResult::pass(name, passed.message, passed.payload),
        Err(failure) => TestResult::fail(name, failure.to_string(), failure.payload()),
    }
}

/// Read an identifier whose presence `TestStep::requires` already checked
fn require(state: &SharedState, key: StateKey) -> String {
    state.get(key).unwrap_or_default().to_string()
}

async fn health_check(transport: &dyn Transport) -> Result<Passed, StepFailure> {
    let resp = transport.get("/health").await?;
    expect_ok(&resp)?;
    Ok(Passed::new("Server is running", resp.body))
}

async fn root_endpoint(transport: &dyn Transport) -> Result<Passed, StepFailure> {
    let resp = transport.get("/").await?;
    expect_ok(&resp)?;
    Ok(Passed::new("Root endpoint working", resp.body))
}

async fn create_users(
    state: &mut SharedState,
    transport: &dyn Transport,
    fixtures: &Fixtures,
) -> Vec<TestResult> {
    let profiles = [
        ("Create Farmer Profile", "farmer", &fixtures.farmer_name, StateKey::FarmerId),
        ("Create Buyer Profile", "buyer", &fixtures.buyer_name, StateKey::BuyerId),
    ];

    let mut results = Vec::with_capacity(profiles.len());
    for (name, role, display_name, key) in profiles {
        let outcome = create_user(transport, role, display_name).await.map(|(id, resp)| {
            state.set(key, id);
            Passed::new(format!("{} created successfully", capitalize(role)), resp)
        });
        results.push(settle(name, outcome));
    }
    results
}

async fn create_user(
    transport: &dyn Transport,
    role: &str,
    display_name: &str,
) -> Result<(String, Option<Value>), StepFailure> {
    let user_id = Uuid::new_v4().to_string();
    let resp = transport
        .post(
            "/users",
            Some(json!({"name": display_name, "role": role})),
            &[("user_id", user_id.as_str())],
        )
        .await?;
    let id = extract_id(expect_envelope(&resp)?, &resp)?;
    Ok((id, resp.body))
}

async fn add_funds(
    state: &SharedState,
    transport: &dyn Transport,
    fixtures: &Fixtures,
) -> Result<Passed, StepFailure> {
    let body = json!({
        "user_id": require(state, StateKey::BuyerId),
        "amount": fixtures.wallet_amount,
    });
    let resp = transport.post("/wallet/add-funds", Some(body), &[]).await?;
    expect_ok(&resp)?;
    Ok(Passed::new("Funds added successfully", resp.body))
}

async fn create_listing(
    state: &mut SharedState,
    transport: &dyn Transport,
    fixtures: &Fixtures,
) -> Result<Passed, StepFailure> {
    let today = Local::now().date_naive();
    let delivery_date = today
        .checked_add_days(Days::new(u64::from(fixtures.delivery_in_days)))
        .unwrap_or(today);

    let body = json!({
        "crop_type": fixtures.crop_type,
        "quantity": fixtures.quantity,
        "delivery_date": payload_of(&delivery_date),
        "expected_price": fixtures.expected_price,
    });
    let farmer_id = require(state, StateKey::FarmerId);
    let resp = transport
        .post("/listings", Some(body), &[("farmer_id", farmer_id.as_str())])
        .await?;

    let id = extract_id(expect_envelope(&resp)?, &resp)?;
    state.set(StateKey::ListingId, id);
    Ok(Passed::new("Listing created successfully", resp.body))
}

async fn list_listings(transport: &dyn Transport) -> Result<Passed, StepFailure> {
    let resp = transport.get("/listings").await?;
    let count = expect_envelope(&resp)?
        .as_array()
        .map(Vec::len)
        .ok_or_else(|| StepFailure::mismatch("`data` is not an array", &resp))?;
    Ok(Passed::new(
        format!("Retrieved {} listings", count),
        Some(json!({ "count": count })),
    ))
}

async fn create_proposal(
    state: &mut SharedState,
    transport: &dyn Transport,
    fixtures: &Fixtures,
) -> Result<Passed, StepFailure> {
    let body = json!({
        "listing_id": require(state, StateKey::ListingId),
        "price": fixtures.offer_price,
        "payment_terms": fixtures.payment_terms,
    });
    let buyer_id = require(state, StateKey::BuyerId);
    let resp = transport
        .post("/proposals", Some(body), &[("buyer_id", buyer_id.as_str())])
        .await?;

    let id = extract_id(expect_envelope(&resp)?, &resp)?;
    state.set(StateKey::ProposalId, id);
    Ok(Passed::new("Proposal created successfully", resp.body))
}

async fn accept_proposal(
    state: &SharedState,
    transport: &dyn Transport,
) -> Result<Passed, StepFailure> {
    let proposal_id = require(state, StateKey::ProposalId);
    let path = resource_path(&["proposals", proposal_id.as_str(), "accept"]);
    let resp = transport.put(&path, None).await?;
    expect_ok(&resp)?;
    Ok(Passed::new("Proposal accepted successfully", resp.body))
}

async fn generate_contract(
    state: &mut SharedState,
    transport: &dyn Transport,
) -> Result<Passed, StepFailure> {
    let body = json!({ "proposal_id": require(state, StateKey::ProposalId) });
    let resp = transport.post("/contracts/generate", Some(body), &[]).await?;

    let id = extract_id(expect_envelope(&resp)?, &resp)?;
    state.set(StateKey::ContractId, id);
    Ok(Passed::new("Contract generated", resp.body))
}

async fn dashboard(transport: &dyn Transport, path: &str) -> Result<Passed, StepFailure> {
    let resp = transport.get(path).await?;
    let keys: Vec<&String> = expect_data_object(&resp)?.keys().collect();
    Ok(Passed::new(
        "Dashboard data retrieved",
        Some(json!({ "keys": keys })),
    ))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
