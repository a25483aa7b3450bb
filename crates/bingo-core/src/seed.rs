//! 种子数据与 NGO 增量迁移
//!
//! 空文档首次启动时写入演示账户、示例上报与合作 NGO 列表。
//! NGO 种子带版本号：已有文档版本落后时按 id 增量合并新 NGO，
//! 绝不覆盖已存在的记录或用户产生的报名 / 捐赠数据。

use bingo_shared::store::JsonStore;
use chrono::{Duration, Utc};
use tracing::info;

use crate::{
    error::{LedgerError, Result},
    model::{
        BingoDocument, MilestoneStatus, Ngo, Report, ReportStatus, Role, User, WasteType,
    },
};

/// NGO 种子版本，新增种子 NGO 时递增
pub const NGO_SEED_VERSION: i64 = 2;

/// 启动时保证文档可用：空文档播种，旧文档做 NGO 增量迁移
pub fn initialize(store: &JsonStore<BingoDocument>) -> Result<()> {
    let seeded = store.mutate(|doc| {
        let mut changed = false;

        if doc.users.is_empty() {
            doc.users = seed_users()?;
            doc.reports = seed_reports();
            changed = true;
        }

        if doc.ngo_seed_version < NGO_SEED_VERSION {
            let existing: Vec<String> = doc.ngos.iter().map(|n| n.id.clone()).collect();
            for ngo in seed_ngos() {
                if !existing.contains(&ngo.id) {
                    doc.ngos.push(ngo);
                }
            }
            doc.ngo_seed_version = NGO_SEED_VERSION;
            changed = true;
        }

        Ok::<_, LedgerError>(changed)
    })?;

    if seeded {
        info!(version = NGO_SEED_VERSION, "document seeded or migrated");
    }
    Ok(())
}

fn demo_user(
    id: &str,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
    points: i64,
    badges: &[&str],
    adopted_street: Option<&str>,
) -> Result<User> {
    let password = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| LedgerError::Internal(format!("password hashing failed: {}", e)))?;
    Ok(User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        password,
        role,
        points,
        total_earned_points: points,
        badges: badges.iter().map(|b| b.to_string()).collect(),
        adopted_street: adopted_street.map(String::from),
        milestone_status: if points >= 500 {
            MilestoneStatus::Unlocked
        } else {
            MilestoneStatus::Locked
        },
    })
}

fn seed_users() -> Result<Vec<User>> {
    Ok(vec![
        demo_user("u001", "Arjun Sharma", "arjun@demo.com", "demo123", Role::Citizen, 520, &["Eco Warrior"], None)?,
        demo_user("u002", "Priya Patel", "priya@demo.com", "demo123", Role::Citizen, 380, &[], Some("MG Road"))?,
        demo_user("u003", "Admin User", "admin@demo.com", "admin123", Role::Admin, 1200, &["Clean Hero"], None)?,
        demo_user("u004", "Karan Mehta", "karan@demo.com", "demo123", Role::Citizen, 210, &[], None)?,
        demo_user("u005", "Neha Singh", "neha@demo.com", "demo123", Role::Citizen, 95, &[], None)?,
    ])
}

fn seed_reports() -> Vec<Report> {
    let now = Utc::now();
    let report = |id: &str,
                  user_id: &str,
                  user_name: &str,
                  area: &str,
                  waste_type: WasteType,
                  description: &str,
                  lat: f64,
                  lng: f64,
                  status: ReportStatus,
                  hours_ago: i64| Report {
        id: id.to_string(),
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        area: area.to_string(),
        waste_type,
        description: description.to_string(),
        lat,
        lng,
        image_url: String::new(),
        co2: waste_type.co2_estimate(),
        status,
        created_at: now - Duration::hours(hours_ago),
        resolved_at: (status == ReportStatus::Resolved).then_some(now),
    };

    vec![
        report(
            "r001", "u001", "Arjun Sharma",
            "Durg Bit – 21.190400, 81.284900", WasteType::Plastic,
            "Large pile of plastic bottles near the park entrance",
            21.1904, 81.2849, ReportStatus::Pending, 5,
        ),
        report(
            "r002", "u002", "Priya Patel",
            "Nehru Nagar – 21.206657, 81.326699", WasteType::Organic,
            "Food waste dumped on roadside, attracting stray animals",
            21.206657, 81.326699, ReportStatus::InProgress, 28,
        ),
        report(
            "r003", "u004", "Karan Mehta",
            "Supela – 21.206651, 81.349166", WasteType::EWaste,
            "Old electronics dumped behind shopping complex",
            21.206651, 81.349166, ReportStatus::Resolved, 72,
        ),
        report(
            "r004", "u005", "Neha Singh",
            "Kali Badi – 21.231303, 81.639805", WasteType::Construction,
            "Rubble from demolished building blocking footpath",
            21.231303, 81.639805, ReportStatus::Escalated, 80,
        ),
        report(
            "r005", "u001", "Arjun Sharma",
            "Maha DevGhat – 21.231716, 81.602416", WasteType::Plastic,
            "Plastic bags floating in the river near the ghat",
            21.231716, 81.602416, ReportStatus::Pending, 2,
        ),
    ]
}

/// 合作 NGO 种子列表
pub fn seed_ngos() -> Vec<Ngo> {
    let ngo = |id: &str,
               name: &str,
               logo: &str,
               description: &str,
               location: &str,
               active_projects: i64,
               total_waste_collected: i64,
               volunteers: i64,
               causes: &[&str],
               category: &str,
               contact_email: &str,
               established: &str| Ngo {
        id: id.to_string(),
        name: name.to_string(),
        logo: logo.to_string(),
        description: description.to_string(),
        location: location.to_string(),
        active_projects,
        total_waste_collected,
        volunteers,
        causes: causes.iter().map(|c| c.to_string()).collect(),
        category: category.to_string(),
        contact_email: contact_email.to_string(),
        established: established.to_string(),
        verified: true,
    };

    vec![
        ngo(
            "ngo1", "GreenEarth Foundation", "🌱",
            "Dedicated to urban waste management and community-driven cleanliness drives across Bhopal and surrounding areas.",
            "Bhopal, MP", 8, 12400, 345,
            &["Urban Cleanliness", "Recycling Awareness", "River Clean-up"],
            "Urban Cleanliness", "greenearth@ngo.org", "2015",
        ),
        ngo(
            "ngo2", "CleanStreets Initiative", "🛣️",
            "Focusing on street-level cleanliness in residential zones with weekly drives and youth engagement programs.",
            "Indore, MP", 5, 8750, 210,
            &["Street Cleanliness", "Youth Engagement", "Plastic-Free Zones"],
            "Urban Cleanliness", "cleanstreets@ngo.org", "2018",
        ),
        ngo(
            "ngo3", "Harit Bhumi Trust", "🌿",
            "Working on sustainable waste processing, composting, and awareness campaigns in rural and semi-urban areas.",
            "Jabalpur, MP", 6, 9200, 180,
            &["Composting", "Rural Sanitation", "Awareness Campaigns"],
            "Rural Sanitation", "haritbhumi@ngo.org", "2016",
        ),
        ngo(
            "ngo4", "Blue Planet Warriors", "💧",
            "Protecting water bodies from plastic pollution through lakeside and riverside clean-up missions.",
            "Bhopal, MP", 4, 6800, 155,
            &["Water Body Clean-up", "Anti-Plastic", "Eco-Tourism"],
            "Water Conservation", "blueplanet@ngo.org", "2019",
        ),
        ngo(
            "ngo5", "Adar Poonawalla Clean City Initiative", "🏙️",
            "A cleanliness and sanitation initiative supporting urban waste management, public hygiene awareness, and sustainable city development aligned with national Swachh Bharat goals.",
            "Multiple Indian Cities", 25, 15000, 1200,
            &["Waste Management", "Urban Sanitation", "Public Awareness"],
            "Cleanliness & Sanitation", "info@cleanpoonawalla.org", "2014",
        ),
        ngo(
            "ngo6", "Environmentalist Foundation of India", "🌊",
            "A non-profit organization focused on ecological restoration, water body rejuvenation, wildlife conservation, and environmental education across India.",
            "Pan India", 40, 20000, 2500,
            &["Lake Restoration", "Biodiversity", "Environmental Education"],
            "Environment Conservation", "connect@efi.org.in", "2010",
        ),
        ngo(
            "ngo7", "Tarun Bharat Sangh", "🏞️",
            "A grassroots organization dedicated to water conservation, river rejuvenation, rural development, and sustainable environmental practices in Rajasthan and North India.",
            "Rajasthan & North India", 18, 8000, 900,
            &["Water Conservation", "River Rejuvenation", "Rural Sustainability"],
            "Water & Rural Development", "info@tarunbharatsangh.org", "1975",
        ),
    ]
}
