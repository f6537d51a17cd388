//! Ordered modifier pipeline

use gcodetexture_core::MoveTarget;

use crate::modifier::{Modifier, TransformContext};

/// Outcome of running a target through the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOutput {
    /// Target after every applicable modifier
    pub target: MoveTarget,
    /// Number of modifiers that applied
    pub applied: usize,
}

/// Ordered chain of modifiers
///
/// Modifiers are applied in registration order; each one receives the
/// target produced by the previous one.
///
/// # Example
/// ```ignore
/// let mut pipeline = ModifierPipeline::new();
/// pipeline.register(Modifier::radial_ripple(5.0, 0.05, 4.0)?);
/// pipeline.register(Modifier::flow_wave(5.0, 1.0, 0.02)?);
///
/// let output = pipeline.apply(&ctx, target, true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ModifierPipeline {
    modifiers: Vec<Modifier>,
}

impl ModifierPipeline {
    /// Create a new empty pipeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a modifier
    pub fn register(&mut self, modifier: Modifier) -> &mut Self {
        self.modifiers.push(modifier);
        self
    }

    /// Append several modifiers, keeping their order
    pub fn register_all(&mut self, modifiers: impl IntoIterator<Item = Modifier>) -> &mut Self {
        self.modifiers.extend(modifiers);
        self
    }

    /// Number of registered modifiers
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// Whether no modifiers are registered
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Modifier at `index`
    pub fn get(&self, index: usize) -> Option<&Modifier> {
        self.modifiers.get(index)
    }

    /// First modifier with the given label
    pub fn get_by_label(&self, label: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.label == label)
    }

    /// Label, type tag and start height of every modifier, in order
    pub fn list(&self) -> Vec<(&str, &str, f64)> {
        self.modifiers
            .iter()
            .map(|m| (m.label.as_str(), m.type_tag(), m.min_height))
            .collect()
    }

    /// Thread a target through every applicable modifier
    ///
    /// Applicability is checked against the Z of the target as it arrives
    /// at each modifier.
    pub fn apply(
        &self,
        ctx: &TransformContext,
        target: MoveTarget,
        has_extrusion: bool,
    ) -> PipelineOutput {
        let mut current = target;
        let mut applied = 0;

        for modifier in &self.modifiers {
            if !modifier.applies_to(current.z, has_extrusion) {
                continue;
            }
            let next = modifier.transform(ctx, &current);
            tracing::trace!("{}: {} -> {}", modifier.label, current, next);
            current = next;
            applied += 1;
        }

        PipelineOutput {
            target: current,
            applied,
        }
    }
}

/// Keep a rewritten extrusion value physically usable
///
/// A negative value becomes half the original value, then anything below
/// `floor` is raised to it.
pub fn clamp_extrusion(new_e: f64, original_e: f64, floor: f64) -> f64 {
    let mut e = new_e;
    if e < 0.0 {
        e = original_e / 2.0;
    }
    if e < floor {
        e = floor;
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodetexture_core::Position;

    fn ctx() -> TransformContext {
        TransformContext {
            position: Position::new(9.0, 0.0, 5.0),
            extrusion_reference: 1.0,
        }
    }

    fn pipeline() -> ModifierPipeline {
        let mut pipeline = ModifierPipeline::new();
        pipeline
            .register(Modifier::radial_ripple(5.0, 0.05, 4.0).unwrap().with_label("ripple"))
            .register(Modifier::flow_wave(5.0, 1.0, 0.02).unwrap().with_label("wave"));
        pipeline
    }

    #[test]
    fn test_registration_order() {
        let pipeline = pipeline();
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.get(0).unwrap().label, "ripple");
        assert_eq!(pipeline.get_by_label("wave").unwrap().type_tag(), "flow_wave");
        assert_eq!(
            pipeline.list(),
            vec![("ripple", "radial_ripple", 5.0), ("wave", "flow_wave", 5.0)]
        );
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let target = MoveTarget::new(1.0, 2.0, 3.0, 4.0);
        let out = ModifierPipeline::new().apply(&ctx(), target, true);
        assert_eq!(out.target, target);
        assert_eq!(out.applied, 0);
    }

    #[test]
    fn test_below_min_height_is_identity() {
        let target = MoveTarget::new(10.0, 3.0, 4.0, 2.0);
        let out = pipeline().apply(&ctx(), target, true);
        assert_eq!(out.target, target);
        assert_eq!(out.applied, 0);
    }

    #[test]
    fn test_extrusion_only_skips_travel() {
        let target = MoveTarget::new(10.0, 3.0, 6.0, 1.0);
        let out = pipeline().apply(&ctx(), target, false);
        assert_eq!(out.applied, 0);
    }

    #[test]
    fn test_order_matters() {
        let target = MoveTarget::new(10.0, 3.0, 6.3, 2.0);
        let forward = pipeline().apply(&ctx(), target, true);

        let mut reversed = ModifierPipeline::new();
        reversed
            .register(Modifier::flow_wave(5.0, 1.0, 0.02).unwrap())
            .register(Modifier::radial_ripple(5.0, 0.05, 4.0).unwrap());
        let backward = reversed.apply(&ctx(), target, true);

        assert_eq!(forward.applied, 2);
        assert_eq!(backward.applied, 2);
        assert_ne!(forward.target.e, backward.target.e);
    }

    #[test]
    fn test_clamp_extrusion() {
        assert_eq!(clamp_extrusion(-0.5, 2.0, 0.0), 1.0);
        assert_eq!(clamp_extrusion(0.8, 2.0, 1.0), 1.0);
        assert_eq!(clamp_extrusion(1.5, 2.0, 1.0), 1.5);
        assert_eq!(clamp_extrusion(-0.5, 2.0, 1.4), 1.4);
    }
}
