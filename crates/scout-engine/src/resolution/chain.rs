use scout_common::locator::LocatorStrategy;
use std::fmt;

/// Ordered fallback list of locator strategies. Position is priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocatorChain {
    label: Option<String>,
    strategies: Vec<LocatorStrategy>,
}

impl LocatorChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chain with a human-readable name used in failure messages.
    pub fn named(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            strategies: Vec::new(),
        }
    }

    /// Append a strategy at the lowest priority.
    pub fn or(mut self, strategy: impl Into<LocatorStrategy>) -> Self {
        self.strategies.push(strategy.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn strategies(&self) -> &[LocatorStrategy] {
        &self.strategies
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LocatorStrategy> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl From<LocatorStrategy> for LocatorChain {
    fn from(strategy: LocatorStrategy) -> Self {
        Self::new().or(strategy)
    }
}

impl From<Vec<LocatorStrategy>> for LocatorChain {
    fn from(strategies: Vec<LocatorStrategy>) -> Self {
        Self {
            label: None,
            strategies,
        }
    }
}

impl FromIterator<LocatorStrategy> for LocatorChain {
    fn from_iter<I: IntoIterator<Item = LocatorStrategy>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a> IntoIterator for &'a LocatorChain {
    type Item = &'a LocatorStrategy;
    type IntoIter = std::slice::Iter<'a, LocatorStrategy>;

    fn into_iter(self) -> Self::IntoIter {
        self.strategies.iter()
    }
}

impl fmt::Display for LocatorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            return f.write_str(label);
        }
        let parts: Vec<String> = self.strategies.iter().map(|s| s.to_string()).collect();
        write!(f, "[{}]", parts.join(" -> "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_common::locator::UiSelector;

    #[test]
    fn preserves_caller_order() {
        let chain = LocatorChain::new()
            .or(LocatorStrategy::accessibility_id("b"))
            .or(LocatorStrategy::resource_id("a"))
            .or(UiSelector::new().text("c"));
        let kinds: Vec<&str> = chain.iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec!["accessibility id", "resource id", "uiautomator"]);
    }

    #[test]
    fn display_prefers_label() {
        let chain = LocatorChain::named("Custom View item").or(LocatorStrategy::text("Custom View"));
        assert_eq!(chain.to_string(), "Custom View item");

        let unnamed: LocatorChain = vec![
            LocatorStrategy::accessibility_id("Text"),
            LocatorStrategy::text("Text"),
        ]
        .into();
        assert_eq!(unnamed.to_string(), "[accessibility id=Text -> text=Text]");
    }
}
