//! Word lists backing the default friendcode dictionaries. All entries are
//! lowercase ASCII and contain no separator character.

pub const ADJECTIVES: &[&str] = &[
    "able", "brave", "bright", "calm", "careful", "cheerful", "clever", "cozy", "curious",
    "daring", "eager", "earnest", "fancy", "fearless", "fierce", "friendly", "gentle", "glad",
    "graceful", "grand", "happy", "hearty", "humble", "jolly", "keen", "kind", "lively", "loyal",
    "lucky", "merry", "mighty", "nimble", "noble", "patient", "plucky", "polite", "proud",
    "quick", "quiet", "rapid", "sincere", "smooth", "snappy", "steady", "sturdy", "swift",
    "tidy", "witty",
];

pub const COLORS: &[&str] = &[
    "amber", "aqua", "azure", "beige", "bronze", "coral", "crimson", "emerald", "fuchsia",
    "golden", "indigo", "ivory", "jade", "lavender", "magenta", "maroon", "olive", "scarlet",
    "silver", "teal",
];

pub const ANIMALS: &[&str] = &[
    "badger", "bear", "beaver", "bison", "camel", "cheetah", "condor", "crane", "dolphin",
    "donkey", "eagle", "falcon", "ferret", "finch", "fox", "gazelle", "gecko", "gibbon",
    "giraffe", "heron", "ibex", "jaguar", "koala", "lemur", "leopard", "lynx", "marmot",
    "meerkat", "moose", "narwhal", "ocelot", "osprey", "otter", "owl", "panda", "pelican",
    "penguin", "puffin", "quokka", "rabbit", "raven", "salmon", "sparrow", "tapir", "toucan",
    "walrus", "wombat", "wren",
];
