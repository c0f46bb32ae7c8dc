#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    pub name: String,
    pub block_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde_derive::Serialize, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub id: String,
    pub name: String,
    pub region_id: String,
}

/// Block > region > base hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub blocks: Vec<Block>,
    pub regions: Vec<Region>,
    pub bases: Vec<Base>,
}

impl Organization {
    pub fn block(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn base(&self, id: &str) -> Option<&Base> {
        self.bases.iter().find(|b| b.id == id)
    }

    pub fn regions_in<'a>(&'a self, block_id: &'a str) -> impl Iterator<Item = &'a Region> + 'a {
        self.regions.iter().filter(move |r| r.block_id == block_id)
    }

    pub fn bases_in<'a>(&'a self, region_id: &'a str) -> impl Iterator<Item = &'a Base> + 'a {
        self.bases.iter().filter(move |b| b.region_id == region_id)
    }
}
