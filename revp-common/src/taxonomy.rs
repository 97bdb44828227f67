//! Label taxonomy and categorization
//!
//! Maps canonical review labels (the identifiers the review form sends in
//! `selectedLabels`) onto five fixed categories. The lookup table is built once
//! on first use and never mutated afterwards.
//!
//! Labels that are not in the table belong to no category and never show up in
//! a bucket.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

/// Review category a label belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Environment,
    Taste,
    Service,
    Price,
    Overall,
}

impl Category {
    /// All categories in bucket order
    pub const ALL: [Category; 5] = [
        Category::Environment,
        Category::Taste,
        Category::Service,
        Category::Price,
        Category::Overall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Environment => "environment",
            Category::Taste => "taste",
            Category::Service => "service",
            Category::Price => "price",
            Category::Overall => "overall",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical labels offered by the review form, grouped by category
const LABEL_TABLE: &[(Category, &[&str])] = &[
    (
        Category::Environment,
        &[
            "环境舒适",
            "环境优雅",
            "装修精致",
            "干净卫生",
            "停车方便",
            "适合聚餐",
            "环境一般",
            "环境嘈杂",
            "座位拥挤",
        ],
    ),
    (
        Category::Taste,
        &[
            "味道正宗",
            "口味很棒",
            "食材新鲜",
            "分量足",
            "菜品丰富",
            "招牌菜好吃",
            "口味一般",
            "偏咸",
            "偏辣",
            "分量偏少",
        ],
    ),
    (
        Category::Service,
        &[
            "态度很好",
            "服务热情",
            "上菜快",
            "服务周到",
            "服务一般",
            "上菜慢",
            "态度冷淡",
        ],
    ),
    (
        Category::Price,
        &[
            "性价比高",
            "价格实惠",
            "物超所值",
            "价格合理",
            "价格偏贵",
            "性价比低",
        ],
    ),
    (
        Category::Overall,
        &[
            "值得推荐",
            "会再来",
            "强烈推荐",
            "体验不错",
            "体验一般",
            "不会再来",
            "不推荐",
        ],
    ),
];

static TAXONOMY: Lazy<HashMap<&'static str, Category>> = Lazy::new(|| {
    LABEL_TABLE
        .iter()
        .flat_map(|(category, labels)| labels.iter().map(move |label| (*label, *category)))
        .collect()
});

/// Look up the category of a single label
///
/// Returns `None` for labels outside the taxonomy.
pub fn category_of(label: &str) -> Option<Category> {
    TAXONOMY.get(label).copied()
}

/// Labels grouped by category for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryBuckets {
    pub environment: Vec<String>,
    pub taste: Vec<String>,
    pub service: Vec<String>,
    pub price: Vec<String>,
    pub overall: Vec<String>,
}

impl CategoryBuckets {
    pub fn get(&self, category: Category) -> &[String] {
        match category {
            Category::Environment => &self.environment,
            Category::Taste => &self.taste,
            Category::Service => &self.service,
            Category::Price => &self.price,
            Category::Overall => &self.overall,
        }
    }

    fn bucket_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Environment => &mut self.environment,
            Category::Taste => &mut self.taste,
            Category::Service => &mut self.service,
            Category::Price => &mut self.price,
            Category::Overall => &mut self.overall,
        }
    }

    /// Bucket contents joined with `separator` (empty string for an empty bucket)
    pub fn joined(&self, category: Category, separator: &str) -> String {
        self.get(category).join(separator)
    }

    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_empty())
    }
}

/// Sort labels into category buckets
///
/// Each known label is appended to its category's bucket in input order.
/// Unknown labels are dropped. Duplicate labels are kept as duplicate entries;
/// whether the form should collapse them has not been settled, so this stays a
/// straight pass-through.
pub fn categorize<S: AsRef<str>>(labels: &[S]) -> CategoryBuckets {
    let mut buckets = CategoryBuckets::default();
    for label in labels {
        let label = label.as_ref();
        if let Some(category) = category_of(label) {
            buckets.bucket_mut(category).push(label.to_string());
        }
    }
    buckets
}
