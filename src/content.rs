//! Drawer content routing.
//!
//! `DrawerContent` is the closed set of overlays the product ships. Every
//! variant carries its typed payload, and `resolve` turns a variant plus the
//! current store context into a concrete view model via an exhaustive match,
//! so an unhandled drawer kind is a compile error rather than a silently
//! empty panel. Details variants carry only the record id and re-resolve
//! through the store at render time, never a stale copy of the record.

use crate::app::AppState;
use crate::drawer::DrawerHost;
use crate::models::{Ammo, Document, Firearm, Gear, NfaItem};
use crate::referrals::ReferralCode;
use crate::wallet::Transaction;
use chrono::{DateTime, Utc};

/// Payment details handed to the confirmation drawer.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentRequest {
    pub recipient: String,
    pub amount: Option<f64>,
    pub label: Option<String>,
    pub message: Option<String>,
}

/// Result of a completed payment, shown in the receipt drawer.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentReceipt {
    pub amount: String,
    pub recipient: String,
    pub recipient_label: Option<String>,
    pub message: Option<String>,
    pub signature: String,
    pub timestamp: DateTime<Utc>,
}

/// Every drawer the application can open.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawerContent {
    AddFirearm,
    AddAmmo,
    AddGear,
    AddDocument,
    AddNfa,
    FirearmDetails { id: i64 },
    AmmoDetails { id: i64 },
    GearDetails { id: i64 },
    DocumentDetails { id: i64 },
    NfaDetails { id: i64 },
    EditFirearm { id: i64 },
    EditAmmo { id: i64 },
    EditGear { id: i64 },
    EditDocument { id: i64 },
    EditNfa { id: i64 },
    ConfirmPayment(PaymentRequest),
    PaymentReceipt(PaymentReceipt),
    TransactionHistory,
    RedeemPresale,
    ReferralDashboard,
    ComingSoon { feature: String },
}

/// Typed view model the host renders. Detail and edit views hold the
/// freshly resolved record; `None` means it vanished from the store since
/// the drawer was opened, and the view shows a not-found body.
#[derive(Clone, Debug)]
pub enum ResolvedView {
    AddFirearm,
    AddAmmo,
    AddGear,
    AddDocument,
    AddNfa,
    FirearmDetails(Option<Firearm>),
    AmmoDetails(Option<Ammo>),
    GearDetails(Option<Gear>),
    DocumentDetails(Option<Document>),
    NfaDetails(Option<NfaItem>),
    EditFirearm(Option<Firearm>),
    EditAmmo(Option<Ammo>),
    EditGear(Option<Gear>),
    EditDocument(Option<Document>),
    EditNfa(Option<NfaItem>),
    ConfirmPayment(PaymentRequest),
    PaymentReceipt(PaymentReceipt),
    TransactionHistory(Vec<Transaction>),
    RedeemPresale,
    ReferralDashboard { code: Option<ReferralCode> },
    ComingSoon { feature: String },
}

/// Resolve drawer content against current store state.
pub fn resolve(content: &DrawerContent, app: &AppState) -> ResolvedView {
    match content {
        DrawerContent::AddFirearm => ResolvedView::AddFirearm,
        DrawerContent::AddAmmo => ResolvedView::AddAmmo,
        DrawerContent::AddGear => ResolvedView::AddGear,
        DrawerContent::AddDocument => ResolvedView::AddDocument,
        DrawerContent::AddNfa => ResolvedView::AddNfa,
        DrawerContent::FirearmDetails { id } => {
            ResolvedView::FirearmDetails(app.firearms.get_by_id(*id))
        }
        DrawerContent::AmmoDetails { id } => ResolvedView::AmmoDetails(app.ammo.get_by_id(*id)),
        DrawerContent::GearDetails { id } => ResolvedView::GearDetails(app.gear.get_by_id(*id)),
        DrawerContent::DocumentDetails { id } => {
            ResolvedView::DocumentDetails(app.documents.get_by_id(*id))
        }
        DrawerContent::NfaDetails { id } => ResolvedView::NfaDetails(app.nfa.get_by_id(*id)),
        DrawerContent::EditFirearm { id } => {
            ResolvedView::EditFirearm(app.firearms.get_by_id(*id))
        }
        DrawerContent::EditAmmo { id } => ResolvedView::EditAmmo(app.ammo.get_by_id(*id)),
        DrawerContent::EditGear { id } => ResolvedView::EditGear(app.gear.get_by_id(*id)),
        DrawerContent::EditDocument { id } => {
            ResolvedView::EditDocument(app.documents.get_by_id(*id))
        }
        DrawerContent::EditNfa { id } => ResolvedView::EditNfa(app.nfa.get_by_id(*id)),
        DrawerContent::ConfirmPayment(request) => ResolvedView::ConfirmPayment(request.clone()),
        DrawerContent::PaymentReceipt(receipt) => ResolvedView::PaymentReceipt(receipt.clone()),
        DrawerContent::TransactionHistory => {
            ResolvedView::TransactionHistory(app.wallet.transactions())
        }
        DrawerContent::RedeemPresale => ResolvedView::RedeemPresale,
        DrawerContent::ReferralDashboard => ResolvedView::ReferralDashboard {
            code: app.referrals.code(),
        },
        DrawerContent::ComingSoon { feature } => ResolvedView::ComingSoon {
            feature: feature.clone(),
        },
    }
}

/// The one sanctioned chained open: a details drawer replacing itself with
/// the matching edit drawer. Returns false (and leaves the drawer alone)
/// when the active content is not a details view.
pub fn open_edit_from_details(drawer: &DrawerHost) -> bool {
    let edit = match drawer.active() {
        Some(DrawerContent::FirearmDetails { id }) => DrawerContent::EditFirearm { id },
        Some(DrawerContent::AmmoDetails { id }) => DrawerContent::EditAmmo { id },
        Some(DrawerContent::GearDetails { id }) => DrawerContent::EditGear { id },
        Some(DrawerContent::DocumentDetails { id }) => DrawerContent::EditDocument { id },
        Some(DrawerContent::NfaDetails { id }) => DrawerContent::EditNfa { id },
        _ => return false,
    };
    drawer.close();
    drawer.open(edit, Default::default());
    true
}
