/// Chart builders: pure functions from (data, configuration, selectors) to
/// a renderable [`figure::Figure`]. No builder panics or errors on an
/// empty or degenerate selection; it returns an empty figure carrying a
/// hint for the shell to display.
pub mod boxplot;
pub mod drift;
pub mod figure;
pub mod heatmap;
pub mod histogram;
pub mod imputation;
pub mod missing;
pub mod quality;
pub mod regression;
pub mod scatter;
