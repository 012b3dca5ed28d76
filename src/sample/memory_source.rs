//! In-memory implementations of [`LabelSource`] and [`FeatureCatalog`].
use polars::prelude::*;

use std::collections::{BTreeMap, HashMap};

use crate::common::SubgraphId;
use crate::error::{RptError, Result};
use super::{
    Container,
    FeatureSetting,
    LabelTable,
    LabelValue,
    MatchTable,
    LabelSource,
    FeatureCatalog,
};


/// Class labels held in memory, keyed by subgraph id.
///
/// # Example
/// ```no_run
/// use rptree::prelude::*;
/// use polars::prelude::*;
///
/// let ids = Series::new("subg_id", &[1_u64, 2, 3]);
/// let label = Series::new("label", &["+", "-", "-"]);
/// let df = DataFrame::new(vec![ids, label]).unwrap();
///
/// let labels = AttributeLabels::from_dataframe(&df, "subg_id", "label")
///     .unwrap();
/// assert!(!labels.is_continuous());
/// ```
#[derive(Debug, Clone)]
pub struct AttributeLabels {
    name: String,
    continuous: bool,
    values: BTreeMap<SubgraphId, Vec<LabelValue>>,
}


impl AttributeLabels {
    /// Construct a categorical label named `name`.
    pub fn discrete<S, I, V>(name: S, rows: I) -> Self
        where S: Into<String>,
              I: IntoIterator<Item = (u64, V)>,
              V: Into<String>,
    {
        let mut labels = Self::empty(name, false);
        for (id, value) in rows {
            labels.push(SubgraphId(id), LabelValue::Discrete(value.into()));
        }
        labels
    }


    /// Construct a real-valued label named `name`.
    pub fn continuous<S, I>(name: S, rows: I) -> Self
        where S: Into<String>,
              I: IntoIterator<Item = (u64, f64)>,
    {
        let mut labels = Self::empty(name, true);
        for (id, value) in rows {
            labels.push(SubgraphId(id), LabelValue::Continuous(value));
        }
        labels
    }


    /// Read the label from the columns `id_column` and `label_column`.
    /// A string or boolean column is categorical;
    /// any other column is cast to `f64` and read as continuous.
    /// Rows with a null id or a null label are skipped.
    pub fn from_dataframe(
        data: &DataFrame,
        id_column: &str,
        label_column: &str,
    ) -> Result<Self>
    {
        let ids = data.column(id_column)?
            .cast(&DataType::UInt64)?;
        let ids = ids.u64()?;
        let series = data.column(label_column)?;

        let labels = match series.dtype() {
            DataType::Utf8 => {
                let values = series.utf8()?;
                let rows = ids.into_iter()
                    .zip(values)
                    .filter_map(|(id, v)| Some((id?, v?.to_string())));
                Self::discrete(label_column, rows)
            },
            DataType::Boolean => {
                let values = series.bool()?;
                let rows = ids.into_iter()
                    .zip(values)
                    .filter_map(|(id, v)| Some((id?, v?.to_string())));
                Self::discrete(label_column, rows)
            },
            _ => {
                let values = series.cast(&DataType::Float64)?;
                let values = values.f64()?;
                let rows = ids.into_iter()
                    .zip(values)
                    .filter_map(|(id, v)| Some((id?, v?)))
                    .collect::<Vec<_>>();
                Self::continuous(label_column, rows)
            },
        };
        Ok(labels)
    }


    fn empty<S>(name: S, continuous: bool) -> Self
        where S: Into<String>
    {
        Self { name: name.into(), continuous, values: BTreeMap::new(), }
    }


    fn push(&mut self, id: SubgraphId, value: LabelValue) {
        self.values.entry(id)
            .or_default()
            .push(value);
    }


    /// Returns a container named `name` holding every labeled subgraph.
    pub fn container<S>(&self, name: S) -> Container
        where S: Into<String>
    {
        Container::new(name, self.values.keys().copied())
    }
}


impl LabelSource for AttributeLabels {
    fn name(&self) -> &str {
        &self.name
    }


    fn is_continuous(&self) -> bool {
        self.continuous
    }


    fn label_table(&self, container: &Container) -> Result<LabelTable> {
        let mut table = LabelTable::new(self.continuous);
        for (&id, values) in self.values.iter() {
            if !container.contains(id) { continue; }
            for value in values {
                table.push(id, value.clone());
            }
        }
        Ok(table)
    }
}


/// Match tables held in memory, keyed by feature-setting signature.
#[derive(Debug, Clone, Default)]
pub struct MatchTableCatalog {
    settings: Vec<FeatureSetting>,
    tables: HashMap<String, MatchTable>,
}


impl MatchTableCatalog {
    /// Construct an empty catalog.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }


    /// Register `setting` with its match table.
    /// Registering the same signature twice replaces the table.
    pub fn insert(&mut self, setting: FeatureSetting, table: MatchTable) {
        let key = setting.signature().to_string();
        if !self.tables.contains_key(&key) {
            self.settings.push(setting);
        }
        self.tables.insert(key, table);
    }


    /// Register `setting` with `(id, matched)` pairs.
    pub fn insert_matches<I>(&mut self, setting: FeatureSetting, matches: I)
        where I: IntoIterator<Item = (u64, bool)>
    {
        let table = matches.into_iter()
            .map(|(id, m)| (SubgraphId(id), m))
            .collect();
        self.insert(setting, table);
    }


    /// Register `setting` with the boolean column `match_column`.
    /// A null entry marks a missing value.
    pub fn insert_dataframe_column(
        &mut self,
        setting: FeatureSetting,
        data: &DataFrame,
        id_column: &str,
        match_column: &str,
    ) -> Result<()>
    {
        let ids = data.column(id_column)?
            .cast(&DataType::UInt64)?;
        let ids = ids.u64()?;
        let matches = data.column(match_column)?
            .cast(&DataType::Boolean)?;
        let matches = matches.bool()?;

        let table = ids.into_iter()
            .zip(matches)
            .filter_map(|(id, m)| Some((SubgraphId(id?), m?)))
            .collect();
        self.insert(setting, table);
        Ok(())
    }


    /// Returns the number of registered settings.
    #[inline]
    pub fn len(&self) -> usize {
        self.settings.len()
    }


    /// Returns `true` if no setting is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}


impl FeatureCatalog for MatchTableCatalog {
    fn feature_settings(&self, _container: &Container)
        -> Result<Vec<FeatureSetting>>
    {
        Ok(self.settings.clone())
    }


    fn match_table(&self, container: &Container, setting: &FeatureSetting)
        -> Result<MatchTable>
    {
        let table = self.tables.get(setting.signature())
            .ok_or_else(|| RptError::Source {
                source_name: "match-table catalog".to_string(),
                message: format!("unknown feature setting `{setting}`"),
            })?;

        let table = table.iter()
            .filter(|(id, _)| container.contains(*id))
            .collect();
        Ok(table)
    }
}
