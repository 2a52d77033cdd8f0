use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Month, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reporting window for the transactions list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "day" => Ok(TimeRange::Day),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "quarter" => Ok(TimeRange::Quarter),
            "year" => Ok(TimeRange::Year),
            _ => Err(anyhow::anyhow!(
                "Invalid range: {}. Must be: day, week, month, quarter, or year",
                s
            )),
        }
    }
}

impl Display for TimeRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            TimeRange::Day => write!(f, "day"),
            TimeRange::Week => write!(f, "week"),
            TimeRange::Month => write!(f, "month"),
            TimeRange::Quarter => write!(f, "quarter"),
            TimeRange::Year => write!(f, "year"),
        }
    }
}

/// Filters for `GET /recharge/transactions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub page: u32,
    pub page_size: u32,
    pub range: TimeRange,
    pub search: String,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 5,
            range: TimeRange::Month,
            search: String::new(),
        }
    }
}

impl TransactionQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
            ("range", self.range.to_string()),
            ("search", self.search.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthKey {
    pub month: u32,
    #[serde(default)]
    pub year: Option<i32>,
}

/// One bucket of the monthly totals aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    #[serde(rename = "_id")]
    pub id: MonthKey,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    #[serde(default)]
    pub monthly_total: Decimal,
    #[serde(default)]
    pub new_clients: u64,
    #[serde(default)]
    pub monthly_data: Vec<MonthlyPoint>,
}

/// A labelled point of the monthly trends chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub amount: Decimal,
}

impl Statistics {
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.monthly_data
            .iter()
            .map(|point| ChartPoint {
                name: month_name(point.id.month),
                amount: point.total,
            })
            .collect()
    }

    /// The "Activity" card: 80% of the monthly total.
    pub fn activity(&self) -> Decimal {
        self.monthly_total * Decimal::new(8, 1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub success: bool,
    #[serde(default)]
    pub statistics: Option<Statistics>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub sender_msisdn: String,
    pub receiver_msisdn: String,
    pub amount: Decimal,
    pub transaction_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub success: bool,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub error: Option<String>,
}

/// Short month name for a 1-based month number (`1` -> `"Jan"`).
pub fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name()[..3].to_string())
        .unwrap_or_else(|| month.to_string())
}

/// Transactions table date format, e.g. `05 Mar 14:30`.
pub fn format_transaction_date(at: &DateTime<Utc>) -> String {
    at.format("%d %b %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_map_to_chart_series() {
        let body = r#"{
            "success": true,
            "statistics": {
                "monthlyTotal": 125000,
                "newClients": 4,
                "monthlyData": [
                    {"_id": {"month": 1, "year": 2024}, "total": 50000},
                    {"_id": {"month": 2}, "total": 75000}
                ]
            }
        }"#;
        let response: StatisticsResponse = serde_json::from_str(body).unwrap();
        let stats = response.statistics.unwrap();

        assert_eq!(stats.new_clients, 4);
        assert_eq!(stats.activity(), Decimal::from(100000));
        let series = stats.chart_series();
        assert_eq!(series[0].name, "Jan");
        assert_eq!(series[1].name, "Feb");
        assert_eq!(series[1].amount, Decimal::from(75000));
    }

    #[test]
    fn month_name_falls_back_to_number() {
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "0");
        assert_eq!(month_name(13), "13");
    }

    #[test]
    fn query_pairs_use_api_names() {
        let query = TransactionQuery {
            page: 2,
            search: "0712".to_string(),
            range: "week".parse().unwrap(),
            ..TransactionQuery::default()
        };
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("page", "2".to_string()),
                ("pageSize", "5".to_string()),
                ("range", "week".to_string()),
                ("search", "0712".to_string()),
            ]
        );
        assert!("fortnight".parse::<TimeRange>().is_err());
    }

    #[test]
    fn transactions_parse_iso_dates() {
        let body = r#"{
            "success": true,
            "pages": 3,
            "transactions": [{
                "senderMsisdn": "254700000001",
                "receiverMsisdn": "0712345678",
                "amount": 10000,
                "transactionId": "TX123",
                "status": "SUCCESS",
                "createdAt": "2024-03-05T14:30:00.000Z"
            }]
        }"#;
        let response: TransactionsResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.pages, 3);
        assert_eq!(
            format_transaction_date(&response.transactions[0].created_at),
            "05 Mar 14:30"
        );
    }
}
