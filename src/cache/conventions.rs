//! Framework conventions for class methods mixed in at runtime
//!
//! Some frameworks add class methods to every subclass of a base class by
//! extending it with `ClassMethods` modules. Nothing in the subclass source
//! shows this, so the cache consults a table of known base classes instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkConvention {
    /// Full name of the base class, e.g. `ActiveRecord::Base`
    pub base_class: String,
    /// Modules whose methods become class methods of every subclass
    #[serde(default)]
    pub mixins: Vec<String>,
}

impl FrameworkConvention {
    pub fn new(base_class: impl Into<String>, mixins: &[&str]) -> Self {
        Self {
            base_class: base_class.into(),
            mixins: mixins.iter().map(|mixin| mixin.to_string()).collect(),
        }
    }

    pub fn rails_defaults() -> Vec<FrameworkConvention> {
        vec![
            FrameworkConvention::new(
                "ActiveRecord::Base",
                &[
                    "ActiveRecord::Associations::ClassMethods",
                    "ActiveRecord::Validations::ClassMethods",
                    "ActiveRecord::Callbacks::ClassMethods",
                    "ActiveRecord::Calculations::ClassMethods",
                    "ActiveRecord::Aggregations::ClassMethods",
                    "ActiveRecord::Acts::List::ClassMethods",
                    "ActiveRecord::Acts::Tree::ClassMethods",
                    "ActiveRecord::Transactions::ClassMethods",
                    "ActiveRecord::Timestamp::ClassMethods",
                ],
            ),
            FrameworkConvention::new(
                "ActionController::Base",
                &[
                    "ActionController::Filters::ClassMethods",
                    "ActionController::Layout::ClassMethods",
                    "ActionController::Helpers::ClassMethods",
                    "ActionController::Scaffolding::ClassMethods",
                    "ActionController::Verification::ClassMethods",
                    "ActionController::Caching::Sweeping::ClassMethods",
                ],
            ),
        ]
    }
}
