use std::fmt;
use std::str::FromStr;

/// The five fixed dashboard pages, in sidebar order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Overview,
    Distribution,
    Relationships,
    CategoricalAnalysis,
    InteractiveCharts,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Distribution,
        Page::Relationships,
        Page::CategoricalAnalysis,
        Page::InteractiveCharts,
    ];

    /// Sidebar label.
    pub fn label(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Distribution => "Distribution",
            Page::Relationships => "Relationships",
            Page::CategoricalAnalysis => "Categorical Analysis",
            Page::InteractiveCharts => "Interactive Charts",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Page::Overview => "📊",
            Page::Distribution => "📉",
            Page::Relationships => "📈",
            Page::CategoricalAnalysis => "📋",
            Page::InteractiveCharts => "🖱",
        }
    }

    /// Heading shown at the top of the page body. The overview has none.
    pub fn heading(self) -> Option<&'static str> {
        match self {
            Page::Overview => None,
            Page::Distribution => Some("📈 Distribution Analysis"),
            Page::Relationships => Some("🔗 Relationship Analysis"),
            Page::CategoricalAnalysis => Some("📊 Categorical Insights"),
            Page::InteractiveCharts => Some("✨ Interactive Visualizations"),
        }
    }

    /// Short name accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Overview => "overview",
            Page::Distribution => "distribution",
            Page::Relationships => "relationships",
            Page::CategoricalAnalysis => "categorical",
            Page::InteractiveCharts => "interactive",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPage(pub String);

impl fmt::Display for UnknownPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = Page::ALL.iter().map(|p| p.slug()).collect();
        write!(f, "unknown page '{}' (expected one of: {})", self.0, known.join(", "))
    }
}

impl std::error::Error for UnknownPage {}

impl FromStr for Page {
    type Err = UnknownPage;

    /// Accepts a slug or a label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Page::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(wanted) || p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_order_is_fixed() {
        let labels: Vec<&str> = Page::ALL.iter().map(|p| p.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Overview",
                "Distribution",
                "Relationships",
                "Categorical Analysis",
                "Interactive Charts"
            ]
        );
        assert_eq!(Page::default(), Page::Overview);
    }

    #[test]
    fn parses_slugs_and_labels() {
        for page in Page::ALL {
            assert_eq!(page.slug().parse::<Page>(), Ok(page));
            assert_eq!(page.label().parse::<Page>(), Ok(page));
        }
        assert_eq!("categorical analysis".parse::<Page>(), Ok(Page::CategoricalAnalysis));
        assert_eq!(" Interactive ".parse::<Page>(), Ok(Page::InteractiveCharts));
    }

    #[test]
    fn unknown_page_lists_choices() {
        let err = "maps".parse::<Page>().unwrap_err();
        assert_eq!(err, UnknownPage("maps".into()));
        assert!(err.to_string().contains("overview, distribution"));
    }
}
