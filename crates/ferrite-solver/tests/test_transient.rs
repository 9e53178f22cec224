#[cfg(test)]
mod tests {
    use ferrite_solver::config::SolverConfig;
    use ferrite_solver::solver::Solver;
    use std::{env, path::Path};

    fn manifest_dir() -> String {
        env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string())
    }

    fn circuits_dir() -> String {
        Path::new(&manifest_dir())
            .parent()
            .and_then(Path::parent)
            .unwrap()
            .join("circuits/")
            .to_str()
            .unwrap()
            .to_string()
    }

    fn run_transient(relative_path: &str) -> Vec<(f64, ferrite_solver::assembler::Solution)> {
        let path = Path::new(&circuits_dir()).join(relative_path);
        let netlist = ferrite_parser::parser::parse_netlist_file(&path).unwrap();
        let solver = Solver::new(netlist.circuit, SolverConfig::default());
        solver.solve(netlist.directive).unwrap().into_transient()
    }

    #[test]
    fn test_rc_charge_matches_exponential_curve() {
        let trajectory = run_transient("rc_charge/rc_charge.cir");

        let result_t0 = &trajectory[0].1;
        assert!((result_t0.get("V(2)").unwrap() - 0.0).abs() < 1e-3);

        let mut previous = 0.0;
        for (_, solution) in &trajectory[1..] {
            let v = *solution.get("V(2)").unwrap();
            assert!(v >= previous - 1e-9, "v(2) should rise monotonically");
            previous = v;
        }

        let result_1ms = trajectory.iter().find(|(t, _)| (t - 1e-3).abs() < 1e-9).unwrap();
        assert!((result_1ms.1.get("V(2)").unwrap() - 0.632).abs() < 5e-3);

        let result_5ms = trajectory.iter().find(|(t, _)| (t - 5e-3).abs() < 1e-9).unwrap();
        assert!((result_5ms.1.get("V(2)").unwrap() - 0.993).abs() < 5e-3);
    }

    #[test]
    fn test_low_pass_filter_step_response() {
        let trajectory = run_transient("low_pass_filter/transient.cir");

        let result_t0 = &trajectory[0].1;
        assert!((result_t0.get("V(1)").unwrap() - 0.0).abs() < 1e-2);
        assert!((result_t0.get("V(2)").unwrap() - 0.0).abs() < 1e-2);

        let result_last = trajectory.last().unwrap();
        assert!((result_last.1.get("V(2)").unwrap() - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_high_pass_filter_step_response_decays_to_zero() {
        let trajectory = run_transient("high_pass_filter/transient.cir");

        let result_last = trajectory.last().unwrap();
        assert!((result_last.1.get("V(2)").unwrap() - 0.0).abs() < 1e-2);
    }

    #[test]
    fn test_half_wave_rectifier_clips_negative_half_cycles() {
        let trajectory = run_transient("half_wave_rectifier/half_wave_rectifier.cir");

        for (t, solution) in &trajectory {
            let v_src = (2.0 * std::f64::consts::PI * 60.0 * t).sin();
            let v_load = *solution.get("V(2)").unwrap();
            if v_src < 0.0 {
                assert!(v_load < 0.05, "load should not go meaningfully negative");
            }
            assert!(v_load <= v_src + 0.05, "load should never exceed the source");
        }
    }

    #[test]
    fn test_rlc_ring_oscillates_around_final_value() {
        let trajectory = run_transient("rlc_ring/rlc_ring.cir");

        let max_v = trajectory
            .iter()
            .map(|(_, s)| *s.get("V(3)").unwrap())
            .fold(f64::MIN, f64::max);
        // An underdamped series RLC driven by a DC step overshoots its final
        // value of 1V before settling.
        assert!(max_v > 1.0);
    }

    #[test]
    fn test_inverter_output_falls_as_input_rises() {
        // Input pulses 0V -> 5V -> 0V every 10ns; the output should sit high
        // while the input is low and fall once the input has risen, within
        // the first plateau (1ns-6ns).
        let trajectory = run_transient("inverter/inverter.cir");

        let result_t0 = &trajectory[0].1;
        assert!(*result_t0.get("V(2)").unwrap() > 4.0);

        let result_plateau = trajectory
            .iter()
            .find(|(t, _)| (t - 3e-9).abs() < 1e-10)
            .unwrap();
        assert!(*result_plateau.1.get("V(2)").unwrap() < 1.0);
    }
}
