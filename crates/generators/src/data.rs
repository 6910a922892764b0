//! Word pools for the builtin generators.

pub const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Wei", "Mei", "Hiroshi", "Yuki", "Ahmed", "Fatima", "Carlos", "Lucia",
    "Olga", "Ivan", "Priya", "Arjun", "Amara", "Kwame", "Sofia", "Lars",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Chen", "Wang", "Tanaka", "Kim", "Nguyen", "Patel",
    "Singh", "Okafor", "Ivanova", "Schmidt", "Rossi", "Silva", "Dubois",
];

pub const GENDERS: &[&str] = &["male", "female"];

pub const EMAIL_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "mail.test",
    "inbox.test",
];

pub const TLDS: &[&str] = &["com", "org", "net", "io", "dev", "info", "biz"];

pub const COMPANY_PREFIXES: &[&str] = &[
    "Acme", "Globex", "Initech", "Umbrella", "Stark", "Wayne", "Hooli", "Vandelay", "Soylent",
    "Cyberdyne", "Tyrell", "Wonka", "Aperture", "Massive", "Blue Sun",
];

pub const COMPANY_SUFFIXES: &[&str] = &["Inc", "LLC", "Group", "Labs", "Corp", "Systems", "Partners"];

pub const JOB_LEVELS: &[&str] = &["Senior", "Junior", "Lead", "Principal", "Chief", "Associate"];

pub const JOB_TITLES: &[&str] = &[
    "Engineer", "Analyst", "Designer", "Manager", "Architect", "Consultant", "Administrator",
    "Developer", "Coordinator", "Specialist", "Officer", "Technician",
];

pub const STREET_NAMES: &[&str] = &[
    "Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Washington", "Lake", "Hill", "Park", "River",
    "Sunset", "Highland", "Forest", "Church", "Mill",
];

pub const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Rd", "Blvd", "Ln", "Dr", "Way", "Ct"];

pub const CITIES: &[&str] = &[
    "Springfield", "Riverside", "Franklin", "Greenville", "Bristol", "Clinton", "Fairview",
    "Salem", "Madison", "Georgetown", "Arlington", "Ashland", "Dover", "Oxford", "Jackson",
    "Burlington", "Manchester", "Milton", "Newport", "Auburn",
];

pub const STATES: &[&str] = &[
    "Alabama", "Alaska", "Arizona", "California", "Colorado", "Florida", "Georgia", "Illinois",
    "Kansas", "Maine", "Michigan", "Nevada", "New York", "Ohio", "Oregon", "Texas", "Utah",
    "Vermont", "Virginia", "Washington",
];

pub const COUNTRIES: &[&str] = &[
    "United States", "Canada", "Mexico", "Brazil", "Argentina", "United Kingdom", "France",
    "Germany", "Italy", "Spain", "Sweden", "Poland", "Nigeria", "Kenya", "Egypt", "India", "China",
    "Japan", "South Korea", "Australia", "New Zealand",
];

pub const MONTHS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

pub const WORDS: &[&str] = &[
    "alpha", "bravo", "cobalt", "delta", "ember", "falcon", "glacier", "harbor", "island",
    "jasper", "kernel", "lantern", "meadow", "nectar", "orbit", "prism", "quartz", "river",
    "summit", "timber", "umber", "vertex", "willow", "xenon", "yonder", "zephyr", "signal",
    "stream", "record", "packet", "cluster", "shard",
];

pub const COLORS: &[&str] = &[
    "red", "orange", "yellow", "green", "blue", "indigo", "violet", "black", "white", "gray",
    "teal", "maroon", "navy", "olive", "silver", "gold",
];
