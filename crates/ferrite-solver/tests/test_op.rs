#[cfg(test)]
mod tests {
    use ferrite_solver::config::SolverConfig;
    use ferrite_solver::solver::op;
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

    #[test]
    fn test_case_1() {
        // Textbook series-parallel circuit.
        let netlist = "3\nV1 2 1 DC 32\nR1 1 0 2\nR2 2 3 4\nR3 2 0 8\nV2 3 0 DC 20\n.TRAN 1e-3 1e-3 BE 1";
        let parsed = ferrite_parser::parser::parse_netlist(netlist).unwrap();
        let solution = op::solve(&parsed.circuit, &SolverConfig::default()).unwrap();

        assert!((solution.get("V(1)").unwrap() - (-8.0)).abs() < 1e-3);
        assert!((solution.get("V(2)").unwrap() - 24.0).abs() < 1e-3);
        assert!((solution.get("V(3)").unwrap() - 20.0).abs() < 1e-3);
        assert!((solution.get("I(V1)").unwrap() - (-4.0)).abs() < 1e-3);
        assert!((solution.get("I(V2)").unwrap() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_voltage_divider_op() {
        let path = Path::new(&circuits_dir()).join("voltage_divider/voltage_divider.cir");
        let netlist = ferrite_parser::parser::parse_netlist_file(&path).unwrap();
        let solution = op::solve(&netlist.circuit, &SolverConfig::default()).unwrap();

        assert!((solution.get("V(in)").unwrap() - 1.0).abs() < 1e-3);
        assert!((solution.get("V(out)").unwrap() - 2.0 / 3.0).abs() < 1e-3);
        assert!((solution.get("I(V1)").unwrap() - (-1.0 / 3000.0)).abs() < 1e-3);
    }

    #[test]
    fn test_opamp_inverter_op() {
        let path = Path::new(&circuits_dir()).join("opamp_inverter/opamp_inverter.cir");
        let netlist = ferrite_parser::parser::parse_netlist_file(&path).unwrap();
        let solution = op::solve(&netlist.circuit, &SolverConfig::default()).unwrap();

        assert!((solution.get("V(3)").unwrap() - (-10.0)).abs() < 1e-3);
    }

    #[test]
    fn test_linear_circuit_converges_in_one_newton_iteration() {
        // A purely resistive network has no nonlinear elements, so
        // `op::solve` never enters the random-restart loop: any tolerance
        // this tight would fail immediately if it did.
        let path = Path::new(&circuits_dir()).join("voltage_divider/voltage_divider.cir");
        let netlist = ferrite_parser::parser::parse_netlist_file(&path).unwrap();
        let mut config = SolverConfig::default();
        config.tolerance = 0.0;
        let solution = op::solve(&netlist.circuit, &config).unwrap();
        assert!((solution.get("V(out)").unwrap() - 2.0 / 3.0).abs() < 1e-9);
    }
}
