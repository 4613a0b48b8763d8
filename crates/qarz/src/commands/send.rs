//! Send command - event-specific notifications

use anyhow::Result;
use qarz_core::{Contacts, Notification};
use qarz_notify::{
    CustomerAlert, CustomerAlertKind, DebtNotice, NotificationEngine, PaymentNotice,
    ReceiptNotice,
};
use std::path::Path;

use crate::cli::{AlertKindArg, SendArgs, SendCommand};
use crate::output::{is_json_mode, print_info, print_notifications};

pub async fn execute(config: Option<&Path>, args: SendArgs) -> Result<()> {
    let engine = super::open_engine(config).await?;
    let sent = send(&engine, args.command).await;
    engine.close().await;

    match sent {
        Some(notification) => print_notifications(&[notification]),
        None if is_json_mode() => print_notifications(&[]),
        None => print_info("Nothing sent: disabled in settings or no active template"),
    }
    Ok(())
}

async fn send(engine: &NotificationEngine, command: SendCommand) -> Option<Notification> {
    let notifiers = engine.notifiers();

    match command {
        SendCommand::Debt {
            user,
            customer,
            customer_id,
            amount,
            total,
        } => {
            let notice = DebtNotice {
                debt_id: None,
                customer_id,
                customer_name: customer,
                amount,
                total_debt: total,
            };
            notifiers.send_debt_notification(&user, &notice).await
        }
        SendCommand::Payment {
            user,
            customer,
            customer_id,
            amount,
            remaining,
        } => {
            let notice = PaymentNotice {
                payment_id: None,
                customer_id,
                customer_name: customer,
                amount,
                remaining_debt: remaining,
            };
            notifiers.send_payment_notification(&user, &notice).await
        }
        SendCommand::Receipt {
            user,
            number,
            customer,
            amount,
        } => {
            let notice = ReceiptNotice {
                receipt_number: number,
                customer_id: None,
                customer_name: customer,
                amount,
            };
            notifiers.send_receipt_notification(&user, &notice).await
        }
        SendCommand::HighDebt {
            user,
            customer,
            customer_id,
            total,
        } => {
            notifiers
                .send_high_debt_warning(&user, customer_id.as_deref(), &customer, total)
                .await
        }
        SendCommand::CustomerAlert {
            user,
            kind,
            customer,
            customer_id,
            amount,
            phone,
            email,
            whatsapp,
        } => {
            let alert = CustomerAlert {
                kind: match kind {
                    AlertKindArg::Days50 => CustomerAlertKind::Debt50Days,
                    AlertKindArg::Days100 => CustomerAlertKind::Debt100Days,
                    AlertKindArg::Reminder => CustomerAlertKind::Reminder,
                },
                customer_id,
                customer_name: customer,
                amount,
                contacts: Contacts {
                    phone_number: phone,
                    email,
                    whatsapp_number: whatsapp,
                },
            };
            notifiers.send_customer_alert(&user, &alert).await
        }
        SendCommand::Manager {
            manager,
            title,
            message,
            priority,
        } => {
            notifiers
                .send_manager_alert(&manager, &title, &message, priority)
                .await
        }
    }
}
