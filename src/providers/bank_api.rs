use super::util::with_retry;
use crate::core::gateway::{BankingGateway, GatewayError};
use crate::core::model::{Account, GoalRef, Money, Transaction};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};
use uuid::Uuid;

const USER_AGENT: &str = "roundup/0.1";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<Account>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeedResponse {
    feed_items: Vec<Transaction>,
}

#[derive(Debug, Serialize)]
struct SavingsGoalRequest<'a> {
    name: &'a str,
    currency: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavingsGoalResponse {
    savings_goal_uid: Uuid,
}

#[derive(Debug, Serialize)]
struct TopUpRequest {
    amount: Money,
}

/// Bank REST API client authenticated with a bearer token.
pub struct BankApiGateway {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl BankApiGateway {
    pub fn new(base_url: &str, token: &str) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(BankApiGateway {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: &str,
    ) -> Result<T, GatewayError> {
        debug!("Requesting {} from {}", context, url);
        let response = with_retry(
            || async {
                self.client
                    .get(url)
                    .bearer_auth(&self.token)
                    .header(ACCEPT, "application/json")
                    .send()
                    .await
            },
            3,
            500,
        )
        .await?;

        let body = read_success(response, context).await?;
        parse(&body, context)
    }

    async fn put_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        request: &B,
        context: &str,
    ) -> Result<String, GatewayError> {
        debug!("Sending {} to {}", context, url);
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        read_success(response, context).await
    }
}

/// Returns the body of a 2xx response, otherwise the status and raw body as an error.
async fn read_success(response: reqwest::Response, context: &str) -> Result<String, GatewayError> {
    let status = response.status();
    let body = response.text().await?;
    debug!(%status, "Received {} response", context);

    if !status.is_success() {
        error!(%status, body = %body, "{} request rejected", context);
        return Err(GatewayError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

fn parse<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, GatewayError> {
    serde_json::from_str(body).map_err(|source| {
        error!(error = ?source, response = %body, "Failed to parse {} response", context);
        GatewayError::Malformed {
            context: context.to_string(),
            source,
        }
    })
}

/// UTC query bounds for a window of calendar dates, padded by a day on each side.
///
/// Transactions are dated in their own offset, so a purchase just after local
/// midnight can sit before UTC midnight; the caller filters the result again.
fn window_bounds(start_date: NaiveDate, end_date: NaiveDate) -> (String, String) {
    let min = start_date
        .pred_opt()
        .unwrap_or(start_date)
        .and_hms_milli_opt(0, 0, 0, 0);
    let max = end_date
        .succ_opt()
        .unwrap_or(end_date)
        .and_hms_milli_opt(23, 59, 59, 999);
    (
        min.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
        max.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default(),
    )
}

#[async_trait]
impl BankingGateway for BankApiGateway {
    #[instrument(name = "BankListAccounts", skip(self))]
    async fn list_accounts(&self) -> Result<Vec<Account>, GatewayError> {
        let response: AccountsResponse = self.get_json(&self.url("accounts"), "accounts").await?;
        Ok(response.accounts)
    }

    #[instrument(
        name = "BankListTransactions",
        skip(self, account),
        fields(account = %account.account_uid)
    )]
    async fn list_transactions(
        &self,
        account: &Account,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Transaction>, GatewayError> {
        let (min, max) = window_bounds(start_date, end_date);
        let url = format!(
            "{}?minTransactionTimestamp={}&maxTransactionTimestamp={}",
            self.url(&format!(
                "accounts/{}/categories/{}/transactions",
                account.account_uid, account.default_category
            )),
            min,
            max
        );

        let response: FeedResponse = self.get_json(&url, "transactions").await?;
        Ok(response.feed_items)
    }

    #[instrument(
        name = "BankCreateGoal",
        skip(self, account),
        fields(account = %account.account_uid)
    )]
    async fn create_goal(
        &self,
        name: &str,
        currency: &str,
        account: &Account,
    ) -> Result<GoalRef, GatewayError> {
        let url = self.url(&format!("accounts/{}/savings-goals", account.account_uid));
        let body = self
            .put_json(&url, &SavingsGoalRequest { name, currency }, "savings goal")
            .await?;

        let response: SavingsGoalResponse = parse(&body, "savings goal")?;
        Ok(GoalRef(response.savings_goal_uid))
    }

    #[instrument(
        name = "BankFundGoal",
        skip(self, account),
        fields(account = %account.account_uid)
    )]
    async fn fund_goal(
        &self,
        amount_minor_units: u64,
        currency: &str,
        goal: GoalRef,
        account: &Account,
    ) -> Result<(), GatewayError> {
        let url = self.url(&format!(
            "accounts/{}/savings-goals/{}/transfer/{}",
            account.account_uid,
            goal,
            Uuid::new_v4()
        ));
        let request = TopUpRequest {
            amount: Money::new(amount_minor_units, currency),
        };

        self.put_json(&url, &request, "transfer").await?;
        Ok(())
    }
}
