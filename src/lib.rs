// protograph library
//
// Public access to the visualization engine, the snapshot format and the
// terminal front end. The `protograph` binary is a thin shell over these
// modules; `engine` can also be driven headless.

pub mod app;
pub mod engine;
pub mod snapshot;
pub mod theme;
pub mod ui;

#[cfg(test)]
mod tests {
    use crate::app::EngineConfig;
    use crate::engine::{layout::Viewport, scene::ActiveSelection, Engine};
    use crate::snapshot::demo_snapshot;
    use std::time::Instant;

    #[test]
    fn test_engine_runs_headless() {
        let config = EngineConfig {
            animate: false,
            ..EngineConfig::default()
        };
        let mut engine = Engine::new(&config, Viewport::new(160.0, 100.0));
        engine.initialize(&demo_snapshot());
        assert!(engine.hull_visuals().is_empty());

        let selection: ActiveSelection = ["Dx.HypertensiveDisorder", "Ctx.GA_>=28w"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        engine.highlight(&selection, Instant::now());

        let hulls = engine.hull_visuals();
        assert_eq!(hulls.len(), 1);
        assert_eq!(hulls[0].id, "hg_allow_expedited_delivery_hypertensive_28");
        let svg = hulls[0].path.to_svg();
        assert!(svg.starts_with('M') && svg.ends_with('Z'));

        for node in engine.node_visuals().iter().filter(|n| selection.contains(&n.id)) {
            assert!(hulls[0].path.contains(node.position), "{} outside its hull", node.id);
        }
    }
}
