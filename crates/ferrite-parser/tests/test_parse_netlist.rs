#[cfg(test)]
mod tests {
    use ferrite_parser::analyses::Directive;
    use ferrite_parser::elements::Element;

    #[test]
    fn test_parse_voltage_source() {
        let netlist = "1\nV1 1 0 DC 5\n.TRAN 1e-3 1e-4 BE 1";
        let parsed = ferrite_parser::parser::parse_netlist(netlist).unwrap();
        assert_eq!(parsed.circuit.elements.len(), 1);

        match &parsed.circuit.elements[0] {
            Element::VoltageSource(vs) => {
                assert_eq!(vs.name, "V1");
                assert_eq!(vs.plus, "1");
                assert_eq!(vs.minus, "0");
            }
            other => panic!("expected a voltage source element, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_current_source() {
        let netlist = "1\nI1 1 0 DC 5\n.TRAN 1e-3 1e-4 BE 1";
        let parsed = ferrite_parser::parser::parse_netlist(netlist).unwrap();
        assert_eq!(parsed.circuit.elements.len(), 1);

        match &parsed.circuit.elements[0] {
            Element::CurrentSource(cs) => {
                assert_eq!(cs.name, "I1");
                assert_eq!(cs.plus, "1");
                assert_eq!(cs.minus, "0");
            }
            other => panic!("expected a current source element, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_multi_element_netlist() {
        let netlist = "9
V1 5 0 DC 2
V2 3 2 DC 0.2
V3 7 6 DC 2
I1 4 8 DC 1e-3
I2 0 6 DC 1e-3
R1 1 5 1.5
R2 1 2 1
R3 5 2 50
R4 5 6 0.1
R5 2 6 1.5
R6 3 4 0.1
R7 8 0 1e3
R8 4 0 10
.TRAN 1e-3 1e-4 BE 1";
        let parsed = ferrite_parser::parser::parse_netlist(netlist).unwrap();
        assert_eq!(parsed.circuit.elements.len(), 13);
        assert_eq!(parsed.circuit.number_of_nodes(), 9);
    }

    #[test]
    fn test_metric_suffixes_are_parsed() {
        let netlist = "2\nV1 1 0 DC 1\nR1 1 2 4.7K\nC1 2 0 100N IC=0\n.TRAN 1e-3 1e-5 BE 1";
        let parsed = ferrite_parser::parser::parse_netlist(netlist).unwrap();

        match &parsed.circuit.elements[1] {
            Element::Resistor(r) => assert!((r.value - 4700.0).abs() < 1e-9),
            other => panic!("expected a resistor element, got {other:?}"),
        }
        match &parsed.circuit.elements[2] {
            Element::Capacitor(c) => assert!((c.value - 100e-9).abs() < 1e-12),
            other => panic!("expected a capacitor element, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_from_file() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .and_then(std::path::Path::parent)
            .unwrap()
            .join("circuits/voltage_divider/voltage_divider.cir");
        let parsed = ferrite_parser::parser::parse_netlist_file(&path).unwrap();
        assert_eq!(parsed.circuit.elements.len(), 3);
        assert!(matches!(parsed.directive, Directive::Tran(_)));
    }

    #[test]
    fn test_parse_missing_value_is_an_error() {
        let netlist = "1\nV1 1 0\n.TRAN 1e-3 1e-4 BE 1";
        assert!(ferrite_parser::parser::parse_netlist(netlist).is_err());
    }
}
