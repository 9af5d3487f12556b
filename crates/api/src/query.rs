//! Campaign list filtering, sorting and pagination.

use insights_core::types::{Campaign, CampaignStatus, Channel, Pagination};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CampaignSortField {
    Name,
    Channel,
    Status,
    Budget,
    Spent,
    Impressions,
    Clicks,
    Conversions,
    Ctr,
    Cpc,
    Roas,
    StartDate,
    EndDate,
}

impl CampaignSortField {
    fn compare(self, a: &Campaign, b: &Campaign) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Channel => a.channel.label().cmp(b.channel.label()),
            Self::Status => a.status.label().cmp(b.status.label()),
            Self::Budget => a.budget.total_cmp(&b.budget),
            Self::Spent => a.spent.total_cmp(&b.spent),
            Self::Impressions => a.impressions.cmp(&b.impressions),
            Self::Clicks => a.clicks.cmp(&b.clicks),
            Self::Conversions => a.conversions.cmp(&b.conversions),
            Self::Ctr => a.ctr.total_cmp(&b.ctr),
            Self::Cpc => a.cpc.total_cmp(&b.cpc),
            Self::Roas => a.roas.total_cmp(&b.roas),
            Self::StartDate => a.start_date.cmp(&b.start_date),
            Self::EndDate => a.end_date.cmp(&b.end_date),
        }
    }
}

impl FromStr for CampaignSortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim().to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "name" => Self::Name,
            "channel" => Self::Channel,
            "status" => Self::Status,
            "budget" => Self::Budget,
            "spent" => Self::Spent,
            "impressions" => Self::Impressions,
            "clicks" => Self::Clicks,
            "conversions" => Self::Conversions,
            "ctr" => Self::Ctr,
            "cpc" => Self::Cpc,
            "roas" => Self::Roas,
            "startdate" => Self::StartDate,
            "enddate" => Self::EndDate,
            other => return Err(format!("unknown sort field: {other}")),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Parameters of the campaigns endpoint. Unset fields are left out of the
/// cache key, so `{}` and an all-`None` query share one entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CampaignQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CampaignStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<Channel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<CampaignSortField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl CampaignQuery {
    pub fn with_status(mut self, status: CampaignStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn sorted_by(mut self, field: CampaignSortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }

    pub fn paged(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Zero is treated like "unset" for both page and limit.
    pub fn effective_page(&self) -> usize {
        self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE)
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT)
    }

    /// Filter, stable-sort and slice `campaigns`.
    pub fn apply(&self, mut campaigns: Vec<Campaign>) -> (Vec<Campaign>, Pagination) {
        if let Some(status) = self.status {
            campaigns.retain(|c| c.status == status);
        }
        if let Some(channel) = self.channel {
            campaigns.retain(|c| c.channel == channel);
        }
        if let Some(field) = self.sort_by {
            let order = self.sort_order.unwrap_or_default();
            campaigns.sort_by(|a, b| match order {
                SortOrder::Asc => field.compare(a, b),
                SortOrder::Desc => field.compare(b, a),
            });
        }

        let page = self.effective_page();
        let limit = self.effective_limit();
        let total = campaigns.len();
        let items = campaigns
            .into_iter()
            .skip((page - 1).saturating_mul(limit))
            .take(limit)
            .collect();

        (items, Pagination::new(page, limit, total))
    }
}
