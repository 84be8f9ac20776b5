//! Configurable chart slots of the daily report.

use super::chart::{ChartStyle, ValueLabel};
use crate::core::aggregate::{Aggregate, Aggregator, Filter};
use crate::errors::{AppError, AppResult};
use crate::models::{Field, OperationKind, OperationSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    /// Rows per group.
    Count,
    /// Sum of `value` per group.
    Sum,
    /// Mean duration per group (plotted as hours and minutes).
    MeanDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlot {
    pub title: String,
    pub style: ChartStyle,
    pub metric: ChartMetric,
    /// Field key or column header, e.g. `collaborator` or `Colaborador`.
    pub group_by: String,
    /// Required by `sum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Restrict the rows to one operation type, e.g. `Baixa`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
    /// Caption of the placeholder image when there is nothing to plot.
    pub empty_caption: String,
}

impl ChartSlot {
    /// CT-e closed per collaborator (pie) and mean time per operation type (bar).
    pub fn defaults() -> Vec<ChartSlot> {
        vec![
            ChartSlot {
                title: "Baixa de CT-e por Colaborador".into(),
                style: ChartStyle::Pie,
                metric: ChartMetric::Sum,
                group_by: Field::Collaborator.key().into(),
                value: Some(Field::CteQuantity.key().into()),
                only_type: Some("Baixa".into()),
                top: None,
                empty_caption: "Sem dados de CT-e por colaborador".into(),
            },
            ChartSlot {
                title: "Tempo Médio por Tipo de Operação (horas)".into(),
                style: ChartStyle::Bar,
                metric: ChartMetric::MeanDuration,
                group_by: Field::Kind.key().into(),
                value: None,
                only_type: None,
                top: None,
                empty_caption: "Sem dados de tempo médio por tipo".into(),
            },
        ]
    }

    pub fn value_label(&self) -> ValueLabel {
        match self.metric {
            ChartMetric::MeanDuration => ValueLabel::HoursMinutes,
            _ => ValueLabel::Plain,
        }
    }

    /// Compute the slot's aggregate, sorted descending (and cut to `top`).
    /// Unknown or unloaded fields are configuration errors.
    pub fn aggregate(&self, set: &OperationSet, filter: &Filter) -> AppResult<Aggregate> {
        let filter = match &self.only_type {
            Some(t) => filter.with_kind(OperationKind::from_label(t)),
            None => filter.clone(),
        };
        let agg = Aggregator::new(set, &filter);
        let group = Field::parse(&self.group_by)?;

        let data = match self.metric {
            ChartMetric::Count => agg.count_by_dimension(group)?,
            ChartMetric::Sum => {
                let value = self.value.as_deref().ok_or_else(|| {
                    AppError::config(format!("chart '{}': metric 'sum' needs a value", self.title))
                })?;
                agg.sum_by_dimension(Field::parse(value)?, group)?
            }
            ChartMetric::MeanDuration => agg.mean_duration(group)?,
        };

        let data = data.sorted_desc();
        Ok(match self.top {
            Some(n) => data.truncated(n),
            None => data,
        })
    }
}
