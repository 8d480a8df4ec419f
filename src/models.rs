mod ids;
mod level;
mod run;
mod theme;

pub use ids::RunId;
pub use level::Level;
pub use run::AnalysisRun;
pub use theme::Theme;
