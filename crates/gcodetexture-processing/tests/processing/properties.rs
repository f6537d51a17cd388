use std::f64::consts::TAU;

use gcodetexture_core::{MoveTarget, Position};
use gcodetexture_processing::math::{
    angular_position, height_modulation_strength, radial_z_displacement,
    volume_consistent_extrusion,
};
use gcodetexture_processing::{clamp_extrusion, Modifier, ModifierPipeline, TransformContext};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_radial_displacement_repeats_every_cycle(
        radius in 1.0f64..100.0,
        angle in -3.0f64..3.0,
        cycles in 1u32..12,
        z in 5.0f64..50.0,
    ) {
        let cycles = f64::from(cycles);
        let strength = height_modulation_strength(z, 5.0, 0.05);
        let shifted = angle + TAU / cycles;

        let a = angular_position(radius * angle.cos(), radius * angle.sin());
        let b = angular_position(radius * shifted.cos(), radius * shifted.sin());
        let da = radial_z_displacement(strength, a, cycles);
        let db = radial_z_displacement(strength, b, cycles);
        prop_assert!((da - db).abs() < 1e-9, "{} vs {}", da, db);
    }

    #[test]
    fn prop_unchanged_geometry_keeps_extrusion(
        x in -50.0f64..50.0,
        y in -50.0f64..50.0,
        z in 0.0f64..100.0,
        e in 0.0f64..1000.0,
    ) {
        let original = MoveTarget::new(x, y, z, e);
        let current = Position::new(0.5, -0.5, z);
        prop_assert_eq!(volume_consistent_extrusion(&current, e / 2.0, &original, z), e);
    }

    #[test]
    fn prop_clamped_extrusion_is_non_negative_and_monotonic(
        new_e in -100.0f64..100.0,
        original_e in 0.0f64..100.0,
        reference in 0.0f64..100.0,
    ) {
        let e = clamp_extrusion(new_e, original_e, reference);
        prop_assert!(e >= 0.0);
        prop_assert!(e >= reference);
    }

    #[test]
    fn prop_pipeline_output_clamps_above_reference(
        angle in 0.0f64..TAU,
        z in 5.0f64..40.0,
        delta in 0.0f64..2.0,
        reference in 0.0f64..500.0,
    ) {
        let mut pipeline = ModifierPipeline::new();
        pipeline
            .register(Modifier::radial_ripple(5.0, 0.05, 4.0).unwrap())
            .register(Modifier::flow_wave(5.0, 1.0, 0.02).unwrap());
        let ctx = TransformContext {
            position: Position::new(20.0, 0.0, z),
            extrusion_reference: reference,
        };
        let original_e = reference + delta;
        let target = MoveTarget::new(20.0 * angle.cos(), 20.0 * angle.sin(), z, original_e);
        let out = pipeline.apply(&ctx, target, true);
        let e = clamp_extrusion(out.target.e, original_e, reference);
        prop_assert!(e >= reference);
        prop_assert!(e >= 0.0);
    }
}
