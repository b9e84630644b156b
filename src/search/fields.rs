//! Index field names used by the business registry Solr core

/// Field names of the registry index
pub struct SolrField;

impl SolrField {
    // Business fields
    pub const NAME: &'static str = "name";
    pub const NAME_Q: &'static str = "name_q";
    pub const NAME_STEM_AGRO: &'static str = "name_stem_agro";
    pub const NAME_SINGLE: &'static str = "name_single_term";
    pub const NAME_SUGGEST: &'static str = "name_suggest";
    pub const IDENTIFIER: &'static str = "identifier";
    pub const IDENTIFIER_Q: &'static str = "identifier_q";
    pub const BN: &'static str = "bn";
    pub const BN_Q: &'static str = "bn_q";
    pub const TYPE: &'static str = "legalType";
    pub const STATE: &'static str = "status";

    // Party fields
    pub const PARTY_NAME: &'static str = "partyName";
    pub const PARTY_NAME_Q: &'static str = "partyName_q";
    pub const PARTY_NAME_STEM_AGRO: &'static str = "partyName_stem_agro";
    pub const PARTY_NAME_SUGGEST: &'static str = "partyName_suggest";
    pub const PARTY_ROLE: &'static str = "partyRoles";
    pub const PARENT_NAME: &'static str = "parentName";
    pub const PARENT_NAME_Q: &'static str = "parentName_q";
    pub const PARENT_IDENTIFIER: &'static str = "parentIdentifier";
    pub const PARENT_IDENTIFIER_Q: &'static str = "parentIdentifier_q";
    pub const PARENT_BN: &'static str = "parentBN";
    pub const PARENT_BN_Q: &'static str = "parentBN_q";
    pub const PARENT_TYPE: &'static str = "parentLegalType";
    pub const PARENT_STATE: &'static str = "parentStatus";
}

/// Key of the primary free-text term in a query mapping
pub const PRIMARY_TERM_KEY: &str = "value";
