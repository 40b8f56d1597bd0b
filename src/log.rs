pub mod targets {
    pub const SCANNER: &str = "scanner";
    pub const PARSER: &str = "parser";
    pub const TABLE: &str = "table";
    pub const ENTAILMENT: &str = "entailment";
}
