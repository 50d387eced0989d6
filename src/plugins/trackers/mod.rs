// Tracker plugin implementations, one per retailer
pub mod amazon;
pub mod inet;
pub mod maxgaming;
pub mod mediamarkt;
pub mod netonnet;
pub mod power;
pub mod spelochsant;
pub mod webhallen;

pub use amazon::AmazonTracker;
pub use inet::InetTracker;
pub use maxgaming::MaxgamingTracker;
pub use mediamarkt::MediamarktTracker;
pub use netonnet::NetonnetTracker;
pub use power::PowerTracker;
pub use spelochsant::SpelochsantTracker;
pub use webhallen::WebhallenTracker;

use scraper::{ElementRef, Selector};

use crate::utils::error::ClassifyError;

pub(crate) fn selector(css: &str) -> Result<Selector, ClassifyError> {
    Selector::parse(css).map_err(|e| ClassifyError::Selector(format!("{}: {:?}", css, e)))
}

/// First match of `css` below `scope`, or an error naming the selector.
pub(crate) fn require<'a>(scope: ElementRef<'a>, css: &str) -> Result<ElementRef<'a>, ClassifyError> {
    let sel = selector(css)?;
    scope.select(&sel).next().ok_or_else(|| ClassifyError::missing(css))
}

pub(crate) fn contains(scope: ElementRef<'_>, css: &str) -> Result<bool, ClassifyError> {
    let sel = selector(css)?;
    Ok(scope.select(&sel).next().is_some())
}

pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>()
}
