//! AWS Cost Explorer implementation of `BillingApi`

use crate::config::AwsConfig;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_costexplorer::{
    Client,
    config::Credentials,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{DateInterval, ForecastResult, Granularity as AwsGranularity, Metric, ResultByTime},
};
use costwatch_core::billing::{
    BillingApi, CostBucket, CostMetric, CostQuery, ForecastBucket, ForecastQuery, Granularity,
};
use costwatch_core::error::{CostwatchError, Result};
use costwatch_core::types::DateRange;
use tracing::{debug, info};

/// Name reported by the static credentials provider
const CREDENTIALS_PROVIDER_NAME: &str = "costwatch-environment";

/// Cost Explorer client wrapper
///
/// Construct once and share; the SDK client is a cheap connection handle.
#[derive(Debug, Clone)]
pub struct CostExplorerBilling {
    client: Client,
}

impl CostExplorerBilling {
    /// Create a client from static credentials
    pub async fn new(config: &AwsConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            config.session_token.clone(),
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        info!("Cost Explorer client ready in region {}", config.region);
        Self::from_client(Client::new(&sdk_config))
    }

    /// Wrap an already configured SDK client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BillingApi for CostExplorerBilling {
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<Vec<CostBucket>> {
        debug!(
            "GetCostAndUsage {} {:?} {}",
            query.time_period, query.granularity, query.metric
        );

        let response = self
            .client
            .get_cost_and_usage()
            .time_period(date_interval(&query.time_period)?)
            .granularity(aws_granularity(query.granularity))
            .metrics(query.metric.to_string())
            .send()
            .await
            .map_err(upstream_error)?;

        Ok(cost_buckets(response.results_by_time(), query.metric))
    }

    async fn get_cost_forecast(&self, query: &ForecastQuery) -> Result<Vec<ForecastBucket>> {
        debug!(
            "GetCostForecast {} {:?} {} at {}%",
            query.time_period, query.granularity, query.metric, query.prediction_interval_level
        );

        let response = self
            .client
            .get_cost_forecast()
            .time_period(date_interval(&query.time_period)?)
            .granularity(aws_granularity(query.granularity))
            .metric(aws_metric(query.metric))
            .prediction_interval_level(query.prediction_interval_level)
            .send()
            .await
            .map_err(upstream_error)?;

        Ok(forecast_buckets(response.forecast_results_by_time()))
    }
}

fn date_interval(range: &DateRange) -> Result<DateInterval> {
    DateInterval::builder()
        .start(range.start_str())
        .end(range.end_str())
        .build()
        .map_err(|e| CostwatchError::InvalidDate(e.to_string()))
}

fn aws_granularity(granularity: Granularity) -> AwsGranularity {
    match granularity {
        Granularity::Monthly => AwsGranularity::Monthly,
    }
}

fn aws_metric(metric: CostMetric) -> Metric {
    match metric {
        CostMetric::BlendedCost => Metric::BlendedCost,
    }
}

fn cost_buckets(results: &[ResultByTime], metric: CostMetric) -> Vec<CostBucket> {
    let key = metric.to_string();
    results
        .iter()
        .map(|result| CostBucket {
            amount: result
                .total()
                .and_then(|total| total.get(&key))
                .and_then(|value| value.amount())
                .map(str::to_string),
        })
        .collect()
}

fn forecast_buckets(results: &[ForecastResult]) -> Vec<ForecastBucket> {
    results
        .iter()
        .map(|result| ForecastBucket {
            mean_value: result.mean_value().map(str::to_string),
            lower_bound: result.prediction_interval_lower_bound().map(str::to_string),
            upper_bound: result.prediction_interval_upper_bound().map(str::to_string),
        })
        .collect()
}

// Service errors carry a readable message; transport errors only have their
// source chain.
fn upstream_error<E, R>(err: SdkError<E, R>) -> CostwatchError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    CostwatchError::Upstream(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_costexplorer::error::ErrorMetadata;
    use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageError;
    use aws_sdk_costexplorer::types::MetricValue;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    #[test]
    fn test_date_interval_uses_iso_dates() {
        let interval = date_interval(&range()).unwrap();
        assert_eq!(interval.start(), "2024-02-01");
        assert_eq!(interval.end(), "2024-03-01");
    }

    #[test]
    fn test_enum_mapping() {
        assert_eq!(aws_granularity(Granularity::Monthly), AwsGranularity::Monthly);
        assert_eq!(aws_metric(CostMetric::BlendedCost), Metric::BlendedCost);
    }

    #[test]
    fn test_cost_buckets_extract_metric_amount() {
        let results = vec![
            ResultByTime::builder()
                .total(
                    "BlendedCost",
                    MetricValue::builder().amount("12.345").unit("USD").build(),
                )
                .build(),
            ResultByTime::builder().build(),
        ];

        let buckets = cost_buckets(&results, CostMetric::BlendedCost);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].amount.as_deref(), Some("12.345"));
        assert_eq!(buckets[1].amount, None);
    }

    #[test]
    fn test_forecast_buckets_copy_interval() {
        let results = vec![
            ForecastResult::builder()
                .mean_value("100.5")
                .prediction_interval_lower_bound("90.1")
                .prediction_interval_upper_bound("110.9")
                .build(),
        ];

        let buckets = forecast_buckets(&results);
        assert_eq!(buckets, vec![ForecastBucket::new("100.5", "90.1", "110.9")]);
    }

    #[test]
    fn test_upstream_error_uses_service_message() {
        let service = GetCostAndUsageError::generic(
            ErrorMetadata::builder()
                .code("AccessDeniedException")
                .message("User is not authorized to call ce:GetCostAndUsage")
                .build(),
        );
        let err = upstream_error(SdkError::<_, ()>::service_error(service, ()));

        match err {
            CostwatchError::Upstream(message) => {
                assert_eq!(message, "User is not authorized to call ce:GetCostAndUsage")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_upstream_error_falls_back_to_source_chain() {
        let err = upstream_error(SdkError::<GetCostAndUsageError, ()>::construction_failure(
            "start date is missing",
        ));

        let message = err.to_string();
        assert!(message.starts_with("failed to construct request"), "{message}");
        assert!(message.contains("start date is missing"), "{message}");
    }

    #[tokio::test]
    async fn test_new_builds_client_for_region() {
        let config = AwsConfig::new("AKIDEXAMPLE", "secret")
            .unwrap()
            .with_region("us-west-2");
        let billing = CostExplorerBilling::new(&config).await;
        let region = billing.client.config().region().map(|r| r.to_string());
        assert_eq!(region.as_deref(), Some("us-west-2"));
    }
}
